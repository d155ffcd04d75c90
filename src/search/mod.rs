//! Search infrastructure for the storefront catalog.
//!
//! Query parsing, layered relevance scoring, post-hoc facet filtering and
//! autocomplete suggestions, all operating on the index built by
//! [`crate::index`].

// Module declarations
pub mod facet;
pub mod query;
pub mod scoring;
pub mod suggest;

// Public re-exports (used via lib.rs)
pub use facet::apply_facet;
pub use query::ParsedQuery;
pub use scoring::rank;
pub use suggest::{DEFAULT_DEBOUNCE, DEFAULT_SUGGEST_LIMIT, SuggestOutcome, Suggester};
