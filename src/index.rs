//! Catalog indexing: converts either catalog shape into a uniform, immutable
//! sequence of searchable entries.
//!
//! The index is rebuilt wholesale on every catalog load and never mutated
//! afterwards. Order follows the source catalog (legacy maps are pre-sorted
//! by path), which keeps fixtures reproducible; ranking re-sorts anyway.

use ahash::AHashSet;

use crate::catalog::{Catalog, KitType, LegacyInfo, ProductRecord};
use crate::normalize::{normalize, tokenize};

/// Fraction of CJK ideographs above which an alias is considered
/// script-specific and excluded from matching.
const CJK_ALIAS_THRESHOLD: f32 = 0.3;

/// One normalized, searchable representation of a catalog product.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Canonical display path for the product image.
    pub image: String,
    pub team: String,
    pub team_short: String,
    /// Stable team identifier; may be empty for unmatched products.
    pub team_key: String,
    /// Coarse category: fan / pro / enfant / retro, or a raw passthrough
    /// value for versions the mapping does not know.
    pub category: String,
    pub kit_type: Option<KitType>,
    /// Free-form season, usually containing a 4-digit year ("2023/24").
    pub season: Option<String>,
    /// Latin-script aliases; CJK-heavy aliases are excluded at build time.
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    /// Normalized concatenation of all matchable text, for substring
    /// fallback scoring.
    pub searchable_text: String,
    /// Normalized tokens drawn from `searchable_text`.
    pub tokens: AHashSet<String>,
    /// Upstream auto-tagging confidence in [0, 1].
    pub confidence: f32,
    pub matched: bool,
}

/// Build the in-memory index from a parsed catalog. Never fails; the worst
/// case for a degenerate catalog is entries with minimal searchable text.
pub fn build_index(catalog: &Catalog) -> Vec<IndexEntry> {
    let entries: Vec<IndexEntry> = match catalog {
        Catalog::Structured(records) => records.iter().map(IndexEntry::from_record).collect(),
        Catalog::Legacy(items) => items
            .iter()
            .map(|(path, info)| IndexEntry::from_legacy(path, info))
            .collect(),
    };

    tracing::info!("Built search index: {} entries", entries.len());
    entries
}

impl IndexEntry {
    fn from_record(record: &ProductRecord) -> Self {
        let aliases: Vec<String> = record
            .team_aliases
            .iter()
            .filter(|a| !a.is_empty() && !is_cjk_alias(a))
            .cloned()
            .collect();

        let season = non_empty(&record.season);
        let (searchable_text, tokens) = searchable(
            &record.team,
            &record.team_short,
            &aliases,
            &record.tags,
            &record.league,
            &record.country,
            season.as_deref(),
        );

        Self {
            image: resolve_image(&record.image),
            team: record.team.clone(),
            team_short: record.team_short.clone(),
            team_key: record.team_key.clone(),
            category: category_from_version(&record.version),
            kit_type: record.kit_type,
            season,
            aliases,
            tags: record.tags.clone(),
            searchable_text,
            tokens,
            confidence: record.confidence_score,
            matched: record.matched,
        }
    }

    fn from_legacy(path: &str, info: &LegacyInfo) -> Self {
        let category = if info.category.is_empty() {
            category_from_path(path)
        } else {
            info.category.clone()
        };

        let (searchable_text, tokens) = searchable(&info.team, "", &[], &[], "", "", None);

        Self {
            image: resolve_image(path),
            team: info.team.clone(),
            team_short: String::new(),
            team_key: String::new(),
            category,
            kit_type: None,
            season: None,
            aliases: Vec::new(),
            tags: Vec::new(),
            searchable_text,
            tokens,
            confidence: info.confidence_score,
            matched: true,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Derive `searchable_text` and the token set from the matchable fields.
fn searchable(
    team: &str,
    team_short: &str,
    aliases: &[String],
    tags: &[String],
    league: &str,
    country: &str,
    season: Option<&str>,
) -> (String, AHashSet<String>) {
    let mut parts: Vec<&str> = vec![team, team_short];
    parts.extend(aliases.iter().map(String::as_str));
    parts.extend(tags.iter().map(String::as_str));
    parts.push(league);
    parts.push(country);
    if let Some(season) = season {
        parts.push(season);
    }

    let joined = parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let text = normalize(&joined);
    let tokens = tokenize(&joined).into_iter().collect();
    (text, tokens)
}

/// Map the pipeline's version string onto a display category.
fn category_from_version(version: &str) -> String {
    match version {
        "fan" | "" => "fan".to_string(),
        "player" => "pro".to_string(),
        "retro" => "retro".to_string(),
        "kit" | "enfant" => "enfant".to_string(),
        other => other.to_string(),
    }
}

/// Guess a category from a legacy path's first segment.
fn category_from_path(path: &str) -> String {
    let first = path.split('/').next().unwrap_or_default();
    match first {
        "player" => "pro".to_string(),
        "kids" => "enfant".to_string(),
        "fan" | "retro" => first.to_string(),
        _ => String::new(),
    }
}

/// Resolve an image reference to a canonical display path.
fn resolve_image(path: &str) -> String {
    if path.is_empty()
        || path.contains("://")
        || path.starts_with('/')
        || path.starts_with("images/")
    {
        path.to_string()
    } else {
        format!("images/{}", path)
    }
}

/// Heuristic from the upstream pipeline: an alias is CJK when more than 30%
/// of its characters fall in the CJK Unified Ideographs block. Deliberately
/// not generalized to other scripts.
fn is_cjk_alias(alias: &str) -> bool {
    let total = alias.chars().count();
    if total == 0 {
        return false;
    }
    let cjk = alias
        .chars()
        .filter(|c| ('\u{4E00}'..='\u{9FFF}').contains(c))
        .count();
    cjk as f32 / total as f32 > CJK_ALIAS_THRESHOLD
}
