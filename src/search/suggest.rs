//! Autocomplete suggestions: debounced remote fetch or local prefix scan.
//!
//! The suggester owns its session cache and debounce state. Remote mode talks
//! to the storefront's suggestion endpoint, firing only once the query has
//! been stable for the debounce window; local mode scans the index directly.
//! Either way a failure is worth at most an empty list, never an error.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use ahash::{AHashMap, AHashSet};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::EngineError;
use crate::index::IndexEntry;
use crate::normalize::normalize;

/// Queries shorter than this (after normalization) never suggest.
const MIN_QUERY_CHARS: usize = 2;

/// Default query-stability window before a remote fetch fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default cap on local-scan suggestions.
pub const DEFAULT_SUGGEST_LIMIT: usize = 8;

/// The result of a suggestion request.
///
/// `Ready` carries the originating cache key so a consumer can discard a
/// response that arrives after the input has moved on — staleness is decided
/// by comparing keys, never by hoping a race did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestOutcome {
    Ready { query: String, labels: Vec<String> },
    /// A newer keystroke superseded this request during its debounce window.
    Superseded,
}

impl SuggestOutcome {
    /// Labels, if this outcome is still current. Superseded outcomes have
    /// none by definition.
    pub fn labels(&self) -> &[String] {
        match self {
            Self::Ready { labels, .. } => labels,
            Self::Superseded => &[],
        }
    }
}

/// Suggestion endpoint body: `{"suggestions": [{"label": ...}, ...]}`.
/// Only the label field is read.
#[derive(Debug, Deserialize)]
struct RemoteBody {
    #[serde(default)]
    suggestions: Vec<RemoteSuggestion>,
}

#[derive(Debug, Deserialize)]
struct RemoteSuggestion {
    #[serde(default)]
    label: String,
}

/// Autocomplete provider with an explicit-lifecycle session cache.
///
/// The cache is created with the suggester, written at most once per distinct
/// query, and cleared only by [`Suggester::reset`] — unbounded on purpose,
/// for the lifetime of one browsing session.
pub struct Suggester {
    client: reqwest::Client,
    endpoint: Option<String>,
    debounce: Duration,
    limit: usize,
    /// Bumped on every remote request; a sleeper that wakes to a different
    /// value has been superseded.
    generation: AtomicU64,
    cache: Mutex<AHashMap<String, Vec<String>>>,
}

impl Suggester {
    /// Remote mode when `endpoint` is set, local prefix scan otherwise.
    pub fn new(endpoint: Option<String>, debounce: Duration, limit: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            debounce,
            limit,
            generation: AtomicU64::new(0),
            cache: Mutex::new(AHashMap::new()),
        }
    }

    /// Produce suggestions for a partial query.
    ///
    /// Under two normalized characters the answer is an immediate empty list.
    /// Remote fetches are debounced by query stability; network or decoding
    /// failures degrade to an empty list.
    pub async fn suggest(&self, index: &[IndexEntry], partial: &str) -> SuggestOutcome {
        let key = partial.to_lowercase();
        let query = normalize(partial);

        if query.chars().count() < MIN_QUERY_CHARS {
            return SuggestOutcome::Ready {
                query: key,
                labels: Vec::new(),
            };
        }

        if let Some(labels) = self.cache.lock().await.get(&key) {
            tracing::debug!("Suggestion cache hit for '{}'", key);
            return SuggestOutcome::Ready {
                query: key,
                labels: labels.clone(),
            };
        }

        match &self.endpoint {
            Some(endpoint) => self.suggest_remote(endpoint, key, partial).await,
            None => {
                let labels = scan_index(index, &query, self.limit);
                self.cache.lock().await.insert(key.clone(), labels.clone());
                SuggestOutcome::Ready { query: key, labels }
            }
        }
    }

    async fn suggest_remote(&self, endpoint: &str, key: String, partial: &str) -> SuggestOutcome {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != my_generation {
            return SuggestOutcome::Superseded;
        }

        match self.fetch(endpoint, partial).await {
            Ok(labels) => {
                self.cache.lock().await.insert(key.clone(), labels.clone());
                SuggestOutcome::Ready { query: key, labels }
            }
            Err(e) => {
                // Not cached: the endpoint may recover within the session.
                tracing::warn!(
                    "{}",
                    EngineError::SuggestionUnavailable {
                        query: key.clone(),
                        reason: format!("{:#}", e),
                    }
                );
                SuggestOutcome::Ready {
                    query: key,
                    labels: Vec::new(),
                }
            }
        }
    }

    async fn fetch(&self, endpoint: &str, partial: &str) -> crate::error::Result<Vec<String>> {
        let body: RemoteBody = self
            .client
            .get(endpoint)
            .query(&[("q", partial)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body
            .suggestions
            .into_iter()
            .map(|s| s.label)
            .filter(|label| !label.is_empty())
            .collect())
    }

    /// Clear the session cache. The only way cached suggestions ever go away.
    pub async fn reset(&self) {
        self.cache.lock().await.clear();
    }
}

impl std::fmt::Debug for Suggester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suggester")
            .field("endpoint", &self.endpoint)
            .field("debounce", &self.debounce)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

/// Single-pass local scan: team display names whose normalized team or short
/// name contains the query, deduplicated by team key, index order preserved.
fn scan_index(index: &[IndexEntry], query: &str, limit: usize) -> Vec<String> {
    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut labels = Vec::new();

    for entry in index {
        if labels.len() >= limit {
            break;
        }
        if entry.team.is_empty() {
            continue;
        }

        // Unmatched entries have no team key; fall back to the display name
        // so two of them do not collapse into one.
        let dedup_key = if entry.team_key.is_empty() {
            entry.team.as_str()
        } else {
            entry.team_key.as_str()
        };
        if seen.contains(dedup_key) {
            continue;
        }

        let team = normalize(&entry.team);
        let short = normalize(&entry.team_short);
        if team.contains(query) || (!short.is_empty() && short.contains(query)) {
            seen.insert(dedup_key);
            labels.push(entry.team.clone());
        }
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::index::build_index;
    use assert2::{check, let_assert};
    use serde_json::json;
    use std::sync::Arc;

    fn local_suggester() -> Suggester {
        Suggester::new(None, DEFAULT_DEBOUNCE, DEFAULT_SUGGEST_LIMIT)
    }

    fn fixture() -> Vec<IndexEntry> {
        build_index(&Catalog::from_value(json!([
            {"team": "Paris Saint-Germain", "team_short": "PSG", "team_key": "psg"},
            {"team": "Paris Saint-Germain", "team_short": "PSG", "team_key": "psg"},
            {"team": "Paris FC", "team_short": "Paris FC", "team_key": "paris fc"},
            {"team": "Real Madrid", "team_short": "Real", "team_key": "real madrid"}
        ])))
    }

    #[tokio::test]
    async fn one_character_query_is_always_empty() {
        let suggester = local_suggester();
        let outcome = suggester.suggest(&fixture(), "p").await;
        check!(outcome.labels().is_empty());
    }

    #[tokio::test]
    async fn local_scan_dedups_by_team_key() {
        let suggester = local_suggester();
        let outcome = suggester.suggest(&fixture(), "paris").await;
        let_assert!(SuggestOutcome::Ready { labels, .. } = outcome);
        check!(labels == vec!["Paris Saint-Germain".to_string(), "Paris FC".to_string()]);
    }

    #[tokio::test]
    async fn local_scan_matches_short_names_and_diacritics() {
        let suggester = local_suggester();
        let outcome = suggester.suggest(&fixture(), "PSG").await;
        check!(outcome.labels() == ["Paris Saint-Germain".to_string()]);

        let outcome = suggester.suggest(&fixture(), "MADRÍD").await;
        check!(outcome.labels() == ["Real Madrid".to_string()]);
    }

    #[tokio::test]
    async fn no_match_yields_empty_not_error() {
        let suggester = local_suggester();
        check!(suggester.suggest(&fixture(), "zz").await.labels().is_empty());
    }

    #[tokio::test]
    async fn local_scan_caps_at_the_limit() {
        let records: Vec<_> = (0..20)
            .map(|i| json!({"team": format!("Racing Club {i}"), "team_key": format!("racing{i}")}))
            .collect();
        let index = build_index(&Catalog::from_value(json!(records)));
        let suggester = local_suggester();
        check!(suggester.suggest(&index, "racing").await.labels().len() == DEFAULT_SUGGEST_LIMIT);
    }

    #[tokio::test]
    async fn results_are_cached_per_query_until_reset() {
        let suggester = local_suggester();
        let first = suggester.suggest(&fixture(), "paris").await;
        // A different index for the same query: the cached answer wins.
        let second = suggester.suggest(&[], "paris").await;
        check!(first == second);

        suggester.reset().await;
        let third = suggester.suggest(&[], "paris").await;
        check!(third.labels().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_keystroke_supersedes_the_pending_fetch() {
        let suggester = Arc::new(Suggester::new(
            Some("http://127.0.0.1:1/api/suggest".to_string()),
            DEFAULT_DEBOUNCE,
            DEFAULT_SUGGEST_LIMIT,
        ));

        let early = suggester.clone();
        let first = tokio::spawn(async move { early.suggest(&[], "par").await });
        // Second keystroke arrives inside the first one's debounce window.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = suggester.suggest(&[], "pari").await;

        check!(first.await.unwrap() == SuggestOutcome::Superseded);
        // The survivor fired; the unreachable endpoint degrades to empty.
        let_assert!(SuggestOutcome::Ready { query, labels } = second);
        check!(query == "pari");
        check!(labels.is_empty());
    }
}
