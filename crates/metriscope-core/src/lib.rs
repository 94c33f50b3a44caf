// Metriscope Core Library
//
// The (small) heart of the system: infer a table's columns from a
// sample page of rows, and fetch bounded pages keyed by opaque
// continuation tokens.

pub mod pager;
pub mod schema;

pub use pager::{fetch_page, MetricsPage, DEFAULT_PAGE_SIZE};
pub use schema::{infer_schema, DEFAULT_SAMPLE_SIZE};

/// Smallest page/sample size the store is ever asked for.
pub const MIN_PAGE_SIZE: usize = 1;

/// Largest page/sample size the store is ever asked for.
pub const MAX_PAGE_SIZE: usize = 500;

/// Clamp a requested page or sample size into the supported range.
/// Out-of-range requests are silently clamped, never rejected.
pub fn clamp_page_size(requested: usize) -> usize {
    requested.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}
