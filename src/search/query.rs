//! Query parsing: contextual modifiers, season detection and team-query
//! extraction.
//!
//! A raw query like "maillot extérieur PSG 2023" carries three different
//! kinds of signal: a kit-type modifier ("extérieur"), a season ("2023") and
//! the team portion ("psg"). Parsing happens once per search, on the
//! normalized query, and everything downstream works off the result.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::KitType;
use crate::normalize::{normalize, tokenize};

/// A season mention: a 4-digit year, optionally followed by `/` or `-` and up
/// to two digits ("2023", "2023/24", "2023-2024" matches its leading year).
/// Restricted to 20xx so product codes do not read as seasons.
static SEASON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(20\d{2})([/-]\d{0,2})?\b").expect("season regex is valid"));

/// Whole-word tokens that select a kit type.
const KIT_TYPE_WORDS: &[(&str, KitType)] = &[
    ("home", KitType::Home),
    ("domicile", KitType::Home),
    ("away", KitType::Away),
    ("exterieur", KitType::Away),
    ("third", KitType::Third),
    ("troisieme", KitType::Third),
];

/// Whole-word tokens that restrict results to the retro category.
const RETRO_WORDS: &[&str] = &["retro", "vintage"];

/// Generic merchandising words that carry no team signal; stripped when
/// isolating the team query.
const NOISE_WORDS: &[&str] = &[
    "maillot", "jersey", "shirt", "kit", "foot", "football", "soccer",
];

/// The decomposed form of a search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Full normalized query.
    pub raw: String,
    /// Normalized query with modifiers, noise words and the season stripped;
    /// the team/brand portion used for prefix and substring scoring.
    pub team_query: String,
    /// Tokens of the full normalized query, for per-token scoring.
    pub tokens: Vec<String>,
    /// Requested kit type, when the query names one.
    pub kit_type: Option<KitType>,
    /// Whether the query restricts results to retro listings.
    pub retro: bool,
    /// 4-digit year of a detected season mention.
    pub season_year: Option<String>,
}

impl ParsedQuery {
    /// Parse a raw user query. Pure; an empty or unintelligible query parses
    /// to an all-empty result rather than an error.
    pub fn parse(query: &str) -> Self {
        let raw = normalize(query);
        if raw.is_empty() {
            return Self::default();
        }

        let tokens = tokenize(&raw);

        let mut kit_type = None;
        let mut retro = false;
        for token in &tokens {
            if kit_type.is_none() {
                kit_type = KIT_TYPE_WORDS
                    .iter()
                    .find(|(word, _)| *word == token.as_str())
                    .map(|(_, kt)| *kt);
            }
            if RETRO_WORDS.contains(&token.as_str()) {
                retro = true;
            }
        }

        let (season_year, without_season) = match SEASON_RE.captures(&raw) {
            Some(caps) => {
                let year = caps[1].to_string();
                let stripped = SEASON_RE.replace_all(&raw, " ").into_owned();
                (Some(year), stripped)
            }
            None => (None, raw.clone()),
        };

        // Drop whitespace-delimited words made up entirely of modifier or
        // noise tokens; hyphenated team names stay intact.
        let team_query = without_season
            .split_whitespace()
            .filter(|word| {
                let word_tokens = tokenize(word);
                word_tokens.is_empty() || !word_tokens.iter().all(|t| is_stop_word(t))
            })
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            raw,
            team_query,
            tokens,
            kit_type,
            retro,
            season_year,
        }
    }
}

fn is_stop_word(token: &str) -> bool {
    KIT_TYPE_WORDS.iter().any(|(word, _)| *word == token)
        || RETRO_WORDS.contains(&token)
        || NOISE_WORDS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("PSG home", Some(KitType::Home))]
    #[case("psg domicile", Some(KitType::Home))]
    #[case("PSG away", Some(KitType::Away))]
    #[case("maillot extérieur psg", Some(KitType::Away))]
    #[case("om third", Some(KitType::Third))]
    #[case("om troisième", Some(KitType::Third))]
    #[case("homework psg", None)] // whole words only
    #[case("psg", None)]
    fn kit_type_modifiers_detected(#[case] query: &str, #[case] expected: Option<KitType>) {
        check!(ParsedQuery::parse(query).kit_type == expected);
    }

    #[rstest]
    #[case("arsenal retro", true)]
    #[case("arsenal rétro", true)]
    #[case("brazil vintage", true)]
    #[case("retrograde arsenal", false)]
    #[case("arsenal", false)]
    fn retro_modifier_detected(#[case] query: &str, #[case] expected: bool) {
        check!(ParsedQuery::parse(query).retro == expected);
    }

    #[rstest]
    #[case("liverpool 2023", Some("2023"))]
    #[case("liverpool 2023/24", Some("2023"))]
    #[case("liverpool 2023-24", Some("2023"))]
    #[case("ajax 1995", None)] // pre-2000 years are not seasons
    #[case("liverpool", None)]
    fn season_years_detected(#[case] query: &str, #[case] expected: Option<&str>) {
        check!(ParsedQuery::parse(query).season_year.as_deref() == expected);
    }

    #[rstest]
    #[case("maillot extérieur real madrid 2024", "real madrid")]
    #[case("PSG away", "psg")]
    #[case("jersey Saint-Étienne retro", "saint-etienne")]
    #[case("arsenal", "arsenal")]
    #[case("retro", "")]
    fn team_query_isolated(#[case] query: &str, #[case] expected: &str) {
        check!(ParsedQuery::parse(query).team_query == expected);
    }

    #[test]
    fn tokens_cover_the_full_query() {
        let parsed = ParsedQuery::parse("PSG away 2023/24");
        check!(parsed.tokens == vec!["psg", "away", "2023", "24"]);
    }

    #[test]
    fn empty_query_parses_to_default() {
        check!(ParsedQuery::parse("") == ParsedQuery::default());
        check!(ParsedQuery::parse("   ") == ParsedQuery::default());
    }
}
