// Metriscope Store Library
//
// Client-side abstraction over the external table-store service:
// the `TableStore` trait, the REST implementation that talks to an
// Azure-Tables-compatible endpoint, and a deterministic in-memory
// backend for tests and local demos.

pub mod filter;
pub mod memory;
pub mod rest;
pub mod traits;

pub use filter::partition_filter;
pub use memory::MemoryTableStore;
pub use rest::RestTableStore;
pub use traits::{RowPage, TableStore};
