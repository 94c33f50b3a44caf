//! Filter expression helpers.
//!
//! The store's query language quotes string literals with single
//! quotes and escapes an embedded quote by doubling it. Every filter
//! this system issues is an equality test on the partition key, built
//! here so schema inference and paging share one escaping rule.

/// Build an equality filter on the partition key for the given machine
/// name. Embedded single quotes are doubled so a hostile value can
/// neither break the expression nor widen the match.
pub fn partition_filter(machine: &str) -> String {
    format!("PartitionKey eq '{}'", escape_literal(machine))
}

/// Escape a string literal for inclusion in a filter expression.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}
