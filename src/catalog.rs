//! Catalog input types and the multi-source async loader.
//!
//! Two catalog shapes exist in the wild: the structured product list produced
//! by the scraper pipeline, and the older path-keyed metadata map. Shape
//! dispatch is an explicit tagged enum selected by a JSON type test (array vs.
//! object) — never by sniffing individual fields.

use serde::Deserialize;
use serde_json::Value;

/// Jersey variant axis, distinct from the fan/pro/retro/kids category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum KitType {
    Home,
    Away,
    Third,
    Goalkeeper,
    Training,
    Special,
}

fn default_true() -> bool {
    true
}

/// One structured product record, as emitted by the catalog pipeline.
///
/// Every field is defaulted so a partially-filled record still parses; a
/// record the pipeline failed to tag degrades to empty strings and sets
/// rather than poisoning the whole catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub team_short: String,
    #[serde(default)]
    pub team_key: String,
    #[serde(default)]
    pub team_aliases: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Kit type; unknown or absent values stay `None`.
    #[serde(rename = "type", default, deserialize_with = "lenient_kit_type")]
    pub kit_type: Option<KitType>,
    /// Version string: fan / player / retro / kit / enfant, or free-form.
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub confidence_score: f32,
    #[serde(default)]
    pub source_url: String,
    /// Whether the upstream pipeline considers the team match reliable.
    #[serde(default = "default_true")]
    pub matched: bool,
}

impl Default for ProductRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            image: String::new(),
            team: String::new(),
            team_short: String::new(),
            team_key: String::new(),
            team_aliases: Vec::new(),
            tags: Vec::new(),
            kit_type: None,
            version: String::new(),
            season: String::new(),
            league: String::new(),
            country: String::new(),
            price: 0.0,
            confidence_score: 0.0,
            source_url: String::new(),
            // An untagged record is still presumed displayable.
            matched: true,
        }
    }
}

/// Loosely-typed info object from the legacy path-keyed metadata map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyInfo {
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub player: String,
    #[serde(default)]
    pub confidence_score: f32,
}

/// A parsed catalog in one of its two supported shapes.
#[derive(Debug, Clone)]
pub enum Catalog {
    /// Flat list of structured product records.
    Structured(Vec<ProductRecord>),
    /// Path-keyed legacy metadata, sorted by path for stable index order.
    Legacy(Vec<(String, LegacyInfo)>),
}

impl Catalog {
    /// Parse a catalog from an already-decoded JSON body.
    ///
    /// Arrays are structured records, objects are legacy metadata, anything
    /// else is an empty catalog. Individual records that fail to parse
    /// degrade to defaults instead of aborting.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Structured(
                items
                    .into_iter()
                    .map(|item| serde_json::from_value(item).unwrap_or_default())
                    .collect(),
            ),
            Value::Object(map) => Self::Legacy(
                // serde_json objects iterate in sorted key order, which keeps
                // legacy index builds reproducible.
                map.into_iter()
                    .map(|(path, info)| (path, serde_json::from_value(info).unwrap_or_default()))
                    .collect(),
            ),
            _ => Self::Structured(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Structured(records) => records.is_empty(),
            Self::Legacy(entries) => entries.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Structured(records) => records.len(),
            Self::Legacy(entries) => entries.len(),
        }
    }
}

/// Accept unknown kit-type strings as `None` instead of failing the record.
fn lenient_kit_type<'de, D>(deserializer: D) -> Result<Option<KitType>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Fetches the catalog from an ordered list of candidate sources.
///
/// The first source whose body fetches and parses wins; a failure falls
/// through to the next candidate with a warning. When every candidate fails
/// the loader yields an empty catalog — catalog unavailability is never an
/// error the caller sees, only an empty result set.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    client: reqwest::Client,
    sources: Vec<String>,
}

impl CatalogLoader {
    pub fn new(sources: Vec<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            sources,
        }
    }

    /// Load the catalog, trying each source in order.
    pub async fn load(&self) -> Catalog {
        for source in &self.sources {
            match self.fetch(source).await {
                Ok(catalog) => {
                    tracing::info!("Loaded catalog from {}: {} records", source, catalog.len());
                    return catalog;
                }
                Err(e) => {
                    tracing::warn!("Catalog source {} unavailable: {:#}", source, e);
                }
            }
        }

        tracing::warn!(
            "{}",
            crate::error::EngineError::CatalogUnavailable {
                attempted: self.sources.len()
            }
        );
        Catalog::Structured(Vec::new())
    }

    async fn fetch(&self, source: &str) -> crate::error::Result<Catalog> {
        let body: Value = self
            .client
            .get(source)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(Catalog::from_value(body))
    }
}
