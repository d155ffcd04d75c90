//! Post-hoc category facet filtering.
//!
//! Facets narrow an already-ranked result set; they never re-rank. The
//! storefront's facet ids differ from the index's category values, hence the
//! small mapping table.

use crate::index::IndexEntry;

/// Facet id → index category. Ids with no mapping are compared literally.
fn facet_category(facet_id: &str) -> &str {
    match facet_id {
        "fan" => "fan",
        "player" => "pro",
        "retro" => "retro",
        "kids" => "enfant",
        other => other,
    }
}

/// Keep the entries matching a selected facet, preserving order.
///
/// `"all"` returns the input unchanged. Pure and stateless.
pub fn apply_facet(results: &[IndexEntry], facet_id: &str) -> Vec<IndexEntry> {
    if facet_id == "all" {
        return results.to_vec();
    }

    let category = facet_category(facet_id);
    results
        .iter()
        .filter(|entry| entry.category == category || entry.category == facet_id)
        .cloned()
        .collect()
}
