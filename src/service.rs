//! The engine's public surface: configuration plus a service tying the
//! catalog loader, index, ranker and suggester together.
//!
//! The index lives behind an async `RwLock` as an `Arc` snapshot: rebuilt
//! wholesale on every catalog load, read-shared and immutable between loads.
//! No concurrent writers exist; searches clone the `Arc` and never hold the
//! lock across ranking.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::catalog::{Catalog, CatalogLoader};
use crate::index::{IndexEntry, build_index};
use crate::search::{self, SuggestOutcome, Suggester};

/// Engine configuration. Deserializable so a host can embed it in its own
/// config file; every field has a working default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ordered candidate catalog sources; the first one that fetches and
    /// parses wins.
    pub catalog_sources: Vec<String>,
    /// Remote suggestion endpoint. Local index scanning when unset.
    pub suggest_endpoint: Option<String>,
    /// Query-stability window before a remote suggestion fetch fires.
    pub debounce_ms: u64,
    /// Cap on local-scan suggestions.
    pub suggest_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog_sources: Vec::new(),
            suggest_endpoint: None,
            debounce_ms: search::DEFAULT_DEBOUNCE.as_millis() as u64,
            suggest_limit: search::DEFAULT_SUGGEST_LIMIT,
        }
    }
}

/// Catalog search, ranking and autocomplete for one storefront session.
#[derive(Debug)]
pub struct SearchService {
    loader: CatalogLoader,
    suggester: Suggester,
    index: RwLock<Arc<Vec<IndexEntry>>>,
}

impl SearchService {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            loader: CatalogLoader::new(config.catalog_sources),
            suggester: Suggester::new(
                config.suggest_endpoint,
                Duration::from_millis(config.debounce_ms),
                config.suggest_limit,
            ),
            index: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Fetch the catalog from the configured sources and rebuild the index.
    /// Returns the entry count; a total source failure leaves an empty index.
    pub async fn reload(&self) -> usize {
        let catalog = self.loader.load().await;
        self.install(&catalog).await
    }

    /// Rebuild the index from an already-parsed catalog body.
    pub async fn install(&self, catalog: &Catalog) -> usize {
        let entries = build_index(catalog);
        let count = entries.len();
        *self.index.write().await = Arc::new(entries);
        count
    }

    /// Rank the current index against a query. The full ordered set is
    /// returned; display layers typically truncate to the top 60.
    pub async fn search(&self, query: &str) -> Vec<IndexEntry> {
        let index = self.snapshot().await;
        search::rank(&index, query)
    }

    /// Autocomplete for a partial query.
    pub async fn suggest(&self, partial: &str) -> SuggestOutcome {
        let index = self.snapshot().await;
        self.suggester.suggest(&index, partial).await
    }

    /// Narrow ranked results by a facet. Pure; see [`search::apply_facet`].
    pub fn apply_facet(results: &[IndexEntry], facet_id: &str) -> Vec<IndexEntry> {
        search::apply_facet(results, facet_id)
    }

    /// Drop all cached suggestions.
    pub async fn reset_suggestions(&self) {
        self.suggester.reset().await;
    }

    pub async fn entry_count(&self) -> usize {
        self.index.read().await.len()
    }

    async fn snapshot(&self) -> Arc<Vec<IndexEntry>> {
        self.index.read().await.clone()
    }
}
