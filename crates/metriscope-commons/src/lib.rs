// Metriscope Commons Library
//
// Shared building blocks used by every other Metriscope crate:
// configuration loading, the common error taxonomy, and the
// schemaless row/value model.

pub mod config;
pub mod errors;
pub mod row;

pub use config::{ServerConfig, StoreConnection};
pub use errors::{StoreError, StoreResult};
pub use row::{ContinuationToken, FieldValue, Row};

/// Name of the system field holding the partition (machine) identifier.
pub const PARTITION_KEY: &str = "PartitionKey";

/// Name of the system field distinguishing rows within a partition.
pub const ROW_KEY: &str = "RowKey";

/// Name of the store-managed timestamp field.
pub const TIMESTAMP: &str = "Timestamp";
