//! Dynamic schema inference.
//!
//! The store enforces no schema, so the column set for a table is
//! derived per request: sample the first page of matching rows, union
//! the property names observed (plus the three system fields), then
//! order them by a static per-table preference list with a
//! case-insensitive alphabetical fallback.
//!
//! A single-page sample is an accepted approximation: a property that
//! only appears in later rows is omitted from the inferred schema.

use log::debug;
use metriscope_commons::{StoreResult, PARTITION_KEY, ROW_KEY, TIMESTAMP};
use metriscope_store::{partition_filter, TableStore};

use crate::clamp_page_size;

/// Sample size used when the caller does not supply one.
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

/// Preferred leading columns per table. Lookup is case-insensitive on
/// the table name; tables not listed here fall back to
/// [`DEFAULT_PREFERRED`]. Data-driven on purpose: adding a table is a
/// one-line change.
const PREFERRED_COLUMNS: &[(&str, &[&str])] = &[
    ("CpuUsage", &[TIMESTAMP, "CpuPercent", PARTITION_KEY, ROW_KEY]),
    ("MemoryUsage", &[TIMESTAMP, "UsedMb", "TotalMb", PARTITION_KEY, ROW_KEY]),
    ("Ping", &[TIMESTAMP, "Target", "LatencyMs", "Success", PARTITION_KEY, ROW_KEY]),
];

/// Minimal ordering for tables without a preference entry.
const DEFAULT_PREFERRED: &[&str] = &[TIMESTAMP, PARTITION_KEY, ROW_KEY];

fn preferred_for(table: &str) -> &'static [&'static str] {
    PREFERRED_COLUMNS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(table))
        .map(|(_, cols)| *cols)
        .unwrap_or(DEFAULT_PREFERRED)
}

/// Infer the ordered column list for `table`, optionally restricted to
/// one machine's partition. Issues exactly one bounded query and reads
/// only its first page.
pub async fn infer_schema(
    store: &dyn TableStore,
    table: &str,
    machine: Option<&str>,
    sample: Option<usize>,
) -> StoreResult<Vec<String>> {
    let sample = clamp_page_size(sample.unwrap_or(DEFAULT_SAMPLE_SIZE));
    let filter = machine.map(partition_filter);
    let page = store
        .query_rows(table, filter.as_deref(), sample, None)
        .await?;

    // Union of observed names, first spelling wins, system fields always
    // present even for an empty sample.
    let mut observed: Vec<String> = Vec::new();
    let push_unique = |name: &str, observed: &mut Vec<String>| {
        if !observed.iter().any(|o| o.eq_ignore_ascii_case(name)) {
            observed.push(name.to_string());
        }
    };
    for system in [PARTITION_KEY, ROW_KEY, TIMESTAMP] {
        push_unique(system, &mut observed);
    }
    for row in &page.rows {
        for name in row.field_names() {
            push_unique(name, &mut observed);
        }
    }

    let columns = order_columns(observed, preferred_for(table));
    debug!(
        "inferred schema for {table}: {} columns from {} sampled rows",
        columns.len(),
        page.rows.len()
    );
    Ok(columns)
}

/// Order observed columns: preferred keys that were actually observed
/// (in declared order, emitting the observed spelling), then everything
/// else case-insensitively alphabetical.
fn order_columns(observed: Vec<String>, preferred: &[&str]) -> Vec<String> {
    let mut ordered = Vec::with_capacity(observed.len());
    let mut rest = observed;

    for want in preferred {
        if let Some(pos) = rest.iter().position(|o| o.eq_ignore_ascii_case(want)) {
            ordered.push(rest.remove(pos));
        }
    }
    rest.sort_by(|a, b| a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()));
    ordered.extend(rest);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use metriscope_commons::FieldValue;
    use metriscope_store::MemoryTableStore;

    fn cpu_store() -> MemoryTableStore {
        let mut store = MemoryTableStore::new();
        store.insert(
            "CpuUsage",
            MemoryTableStore::row(&[
                ("PartitionKey", FieldValue::Text("srv-01".into())),
                ("RowKey", FieldValue::Text("0001".into())),
                ("Timestamp", FieldValue::Text("2024-05-17T08:30:00Z".into())),
                ("CpuPercent", FieldValue::Number(43.2)),
                ("LoadAvg", FieldValue::Number(1.5)),
            ]),
        );
        store.insert(
            "CpuUsage",
            MemoryTableStore::row(&[
                ("PartitionKey", FieldValue::Text("srv-01".into())),
                ("RowKey", FieldValue::Text("0002".into())),
                ("Timestamp", FieldValue::Text("2024-05-17T08:31:00Z".into())),
                ("CpuPercent", FieldValue::Number(50.1)),
                ("CoreCount", FieldValue::Integer(8)),
            ]),
        );
        store
    }

    #[tokio::test]
    async fn preferred_prefix_then_alphabetical_rest() {
        let store = cpu_store();
        let columns = infer_schema(&store, "CpuUsage", Some("srv-01"), None)
            .await
            .unwrap();
        assert_eq!(
            columns,
            vec!["Timestamp", "CpuPercent", "PartitionKey", "RowKey", "CoreCount", "LoadAvg"]
        );
    }

    #[tokio::test]
    async fn unknown_table_uses_default_ordering() {
        let mut store = MemoryTableStore::new();
        store.insert(
            "DiskFree",
            MemoryTableStore::row(&[
                ("PartitionKey", FieldValue::Text("srv-01".into())),
                ("RowKey", FieldValue::Text("0001".into())),
                ("Timestamp", FieldValue::Text("2024-05-17T08:30:00Z".into())),
                ("bytesFree", FieldValue::Integer(1_000_000)),
                ("Mount", FieldValue::Text("/".into())),
            ]),
        );
        let columns = infer_schema(&store, "DiskFree", None, None).await.unwrap();
        assert_eq!(
            columns,
            vec!["Timestamp", "PartitionKey", "RowKey", "bytesFree", "Mount"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn empty_table_still_has_system_columns() {
        let mut store = MemoryTableStore::new();
        store.create_table("CpuUsage");
        let columns = infer_schema(&store, "CpuUsage", None, None).await.unwrap();
        assert_eq!(columns, vec!["Timestamp", "PartitionKey", "RowKey"]);
    }

    #[tokio::test]
    async fn table_name_lookup_is_case_insensitive() {
        let store = cpu_store();
        let columns = infer_schema(&store, "CpuUsage", None, None).await.unwrap();
        let via_lower = order_columns(
            columns.clone(),
            preferred_for("cpuusage"),
        );
        assert_eq!(columns, via_lower);
        assert_eq!(preferred_for("CPUUSAGE"), preferred_for("CpuUsage"));
    }

    #[tokio::test]
    async fn duplicate_spellings_collapse_to_first_seen() {
        let mut store = MemoryTableStore::new();
        store.insert(
            "Ping",
            MemoryTableStore::row(&[
                ("PartitionKey", FieldValue::Text("srv-01".into())),
                ("RowKey", FieldValue::Text("0001".into())),
                ("LatencyMs", FieldValue::Number(12.0)),
            ]),
        );
        store.insert(
            "Ping",
            MemoryTableStore::row(&[
                ("PartitionKey", FieldValue::Text("srv-01".into())),
                ("RowKey", FieldValue::Text("0002".into())),
                ("latencyms", FieldValue::Number(15.0)),
            ]),
        );
        let columns = infer_schema(&store, "Ping", None, None).await.unwrap();
        let latency: Vec<&String> = columns
            .iter()
            .filter(|c| c.eq_ignore_ascii_case("LatencyMs"))
            .collect();
        assert_eq!(latency, vec!["LatencyMs"]);
    }

    #[test]
    fn ordering_is_a_permutation_of_the_observed_set() {
        let observed: Vec<String> = ["PartitionKey", "RowKey", "Timestamp", "Zeta", "alpha", "CpuPercent"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ordered = order_columns(observed.clone(), preferred_for("CpuUsage"));
        assert_eq!(ordered.len(), observed.len());
        for name in &observed {
            assert!(ordered.contains(name));
        }
        assert_eq!(
            ordered,
            vec!["Timestamp", "CpuPercent", "PartitionKey", "RowKey", "alpha", "Zeta"]
        );
    }

    #[tokio::test]
    async fn sample_size_is_clamped() {
        let store = cpu_store();
        // 0 and 10_000 clamp into range rather than erroring.
        assert!(infer_schema(&store, "CpuUsage", None, Some(0)).await.is_ok());
        assert!(infer_schema(&store, "CpuUsage", None, Some(10_000)).await.is_ok());
    }
}
