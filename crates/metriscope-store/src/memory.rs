//! In-memory table-store backend.
//!
//! Deterministic stand-in for the external service, used by unit and
//! integration tests (and handy for local demos). Supports exactly the
//! slice of the store contract this system exercises: table
//! enumeration, equality filters on the partition key, page-size
//! hints, and index-based continuation tokens.

use std::collections::BTreeMap;

use async_trait::async_trait;
use metriscope_commons::{ContinuationToken, FieldValue, Row, StoreError, StoreResult};

use crate::traits::{RowPage, TableStore};

/// In-memory store: table name → rows in store order.
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: BTreeMap<String, Vec<Row>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table, creating it empty if it does not exist.
    pub fn create_table(&mut self, name: impl Into<String>) -> &mut Self {
        self.tables.entry(name.into()).or_default();
        self
    }

    /// Append a row to a table, creating the table on first use.
    pub fn insert(&mut self, table: &str, row: Row) -> &mut Self {
        self.tables.entry(table.to_string()).or_default().push(row);
        self
    }

    /// Convenience for tests: build a row from (name, value) pairs.
    pub fn row(fields: &[(&str, FieldValue)]) -> Row {
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }
}

/// Parse the one filter shape this backend understands:
/// `PartitionKey eq '<literal>'` with doubled quotes unescaped.
fn parse_partition_filter(filter: &str) -> StoreResult<String> {
    let rest = filter
        .strip_prefix("PartitionKey eq '")
        .and_then(|r| r.strip_suffix('\''))
        .ok_or_else(|| StoreError::Request(format!("unsupported filter expression: {filter}")))?;
    // A doubled quote is an escaped literal quote; a lone one would have
    // ended the literal early and left a dangling suffix above.
    Ok(rest.replace("''", "'"))
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn list_tables(&self) -> StoreResult<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    async fn query_rows(
        &self,
        table: &str,
        filter: Option<&str>,
        top: usize,
        token: Option<&ContinuationToken>,
    ) -> StoreResult<RowPage> {
        let rows = self
            .tables
            .get(table)
            .ok_or_else(|| StoreError::Request(format!("TableNotFound: {table}")))?;

        let wanted = match filter {
            Some(f) => Some(parse_partition_filter(f)?),
            None => None,
        };
        let matching: Vec<&Row> = rows
            .iter()
            .filter(|row| match &wanted {
                Some(machine) => row.partition_key() == Some(machine.as_str()),
                None => true,
            })
            .collect();

        let start: usize = match token {
            Some(t) => t
                .as_str()
                .parse()
                .map_err(|_| StoreError::Request(format!("invalid continuation token: {t}")))?,
            None => 0,
        };
        let top = top.max(1);
        let end = (start + top).min(matching.len());
        let page: Vec<Row> = matching
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|row| (*row).clone())
            .collect();
        let next = if end < matching.len() {
            ContinuationToken::new(end.to_string())
        } else {
            None
        };

        Ok(RowPage { rows: page, next })
    }
}
