//! kitsearch: product search, ranking and autocomplete for a jersey
//! storefront.
//!
//! The engine consumes a catalog (structured product list or legacy
//! path-keyed metadata) and free-text queries, and produces relevance-ordered
//! results plus autocomplete suggestions. Rendering, cart state and checkout
//! stay with the host application; nothing in here is fatal to it — every
//! failure degrades to an empty result or suggestion list.

pub mod catalog;
pub mod error;
pub mod index;
pub mod normalize;
pub mod search;
pub mod service;
pub mod tracing;

pub use catalog::{Catalog, CatalogLoader, KitType};
pub use error::EngineError;
pub use index::{IndexEntry, build_index};
pub use search::{SuggestOutcome, Suggester, apply_facet, rank};
pub use service::{EngineConfig, SearchService};
