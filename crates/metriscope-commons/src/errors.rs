//! Shared error types for Metriscope.
//!
//! The taxonomy is deliberately small: a request either fails because
//! the table store was never configured, because the configuration is
//! unusable, or because the store itself rejected the query. Missing
//! data is never an error (an absent machine simply yields an empty
//! page).

use thiserror::Error;

/// Result type for store-facing operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by the table-store client and the query layers above it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No connection string was supplied. Checked before any network I/O.
    #[error("table store connection is not configured")]
    NotConfigured,

    /// The connection string was present but could not be used.
    #[error("invalid table store configuration: {0}")]
    InvalidConfig(String),

    /// The store rejected or failed a query; carries the store's own
    /// error text verbatim. Never retried.
    #[error("table store request failed: {0}")]
    Request(String),

    /// The store answered but the response body could not be decoded.
    #[error("failed to decode table store response: {0}")]
    Decode(String),
}

impl StoreError {
    /// True when the failure is a configuration problem rather than a
    /// store-side one.
    pub fn is_configuration(&self) -> bool {
        matches!(self, StoreError::NotConfigured | StoreError::InvalidConfig(_))
    }
}
