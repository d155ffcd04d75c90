//! Text normalization and tokenization for search matching.
//!
//! Everything the engine compares — team names, aliases, tags, queries — goes
//! through [`normalize`] first, so "Bayern München" and "bayern munchen" are
//! the same string by the time scoring sees them.

use unicode_normalization::UnicodeNormalization;

/// Canonicalize text for matching: NFD decomposition, strip combining marks,
/// lowercase, trim.
///
/// Pure and total. Empty input yields an empty string, and the function is
/// idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Split text into normalized tokens on runs of non-alphanumeric characters,
/// discarding empties.
///
/// `"Real Madrid 2023/24"` → `["real", "madrid", "2023", "24"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Combining marks have Unicode category Mn (Mark, Nonspacing).
/// Covers the blocks produced by NFD for Latin, Greek and Cyrillic input.
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}' // Combining Half Marks
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("Bayern München", "bayern munchen")]
    #[case("Saint-Étienne", "saint-etienne")]
    #[case("  PSG  ", "psg")]
    #[case("Atlético de Madrid", "atletico de madrid")]
    #[case("", "")]
    fn normalize_strips_diacritics_and_case(#[case] input: &str, #[case] expected: &str) {
        check!(normalize(input) == expected);
    }

    #[rstest]
    #[case("Bayern München")]
    #[case("Real Madrid 2023/24")]
    #[case("  troisième  ")]
    #[case("皇马")]
    fn normalize_is_idempotent(#[case] input: &str) {
        let once = normalize(input);
        check!(normalize(&once) == once);
    }

    #[rstest]
    #[case("Real Madrid 2023/24", &["real", "madrid", "2023", "24"])]
    #[case("Saint-Étienne", &["saint", "etienne"])]
    #[case("maillot   extérieur!!", &["maillot", "exterieur"])]
    #[case("", &[])]
    #[case("---", &[])]
    fn tokenize_splits_on_non_alphanumeric(#[case] input: &str, #[case] expected: &[&str]) {
        check!(tokenize(input) == expected);
    }
}
