//! Table-store backend abstraction.
//!
//! The external store is the only collaborator this system has, so its
//! whole contract fits in one trait: enumerate table names, and fetch
//! one bounded page of rows at a time. Continuation tokens returned in
//! a [`RowPage`] are opaque; callers store and replay them verbatim.

use async_trait::async_trait;
use metriscope_commons::{ContinuationToken, Row, StoreResult};

/// One page of query results.
#[derive(Debug, Clone, Default)]
pub struct RowPage {
    /// Rows in store-determined order (typically by row key within a
    /// partition). Empty when nothing matched.
    pub rows: Vec<Row>,
    /// Cursor for the next page; `None` when the query is exhausted.
    pub next: Option<ContinuationToken>,
}

/// Read-only access to a schemaless table store.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Enumerate every table name in the store, following the store's
    /// own pagination until exhausted.
    async fn list_tables(&self) -> StoreResult<Vec<String>>;

    /// Fetch exactly one page of rows from `table`.
    ///
    /// `filter` is a store filter expression (see [`crate::partition_filter`]),
    /// `top` is the page-size hint passed through to the store, and
    /// `token` resumes a prior query. Every returned row carries the
    /// three system fields.
    async fn query_rows(
        &self,
        table: &str,
        filter: Option<&str>,
        top: usize,
        token: Option<&ContinuationToken>,
    ) -> StoreResult<RowPage>;
}
