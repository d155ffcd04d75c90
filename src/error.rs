//! Error handling types and utilities.

use thiserror::Error;

/// A specialized Result type for kitsearch internals.
///
/// This is an alias for `anyhow::Result`; context is attached via
/// `.context()` / `.with_context()` at the call sites that need it.
pub type Result<T> = anyhow::Result<T>;

/// Recoverable failures inside the engine.
///
/// None of these cross the public API: each one is logged where it occurs
/// and degrades to an empty result set, an empty suggestion list, or a
/// minimally-populated index entry.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Every candidate catalog source failed to fetch or parse.
    #[error(
        "no catalog source available ({attempted} candidates tried), proceeding with empty index"
    )]
    CatalogUnavailable { attempted: usize },

    /// The remote suggestion endpoint failed or returned an invalid body.
    #[error("suggestion endpoint unavailable for query '{query}': {reason}")]
    SuggestionUnavailable { query: String, reason: String },
}
