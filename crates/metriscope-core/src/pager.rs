//! Paged metric queries.
//!
//! One call, one bounded store query: build the escaped equality filter
//! for the machine's partition, resume from the caller's continuation
//! token verbatim, and hand back the page plus the next token. All
//! pagination state lives with the caller.

use log::debug;
use metriscope_commons::{
    ContinuationToken, FieldValue, Row, StoreResult, PARTITION_KEY, ROW_KEY, TIMESTAMP,
};
use metriscope_store::{partition_filter, TableStore};

use crate::clamp_page_size;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// One page of metric rows plus the cursor for the next page.
#[derive(Debug, Clone, Default)]
pub struct MetricsPage {
    pub items: Vec<Row>,
    pub continuation_token: Option<ContinuationToken>,
}

/// Fetch one page of rows for `machine` from `table`.
///
/// `take` defaults to [`DEFAULT_PAGE_SIZE`] and is clamped to the
/// supported range. An absent machine is not an error: the result is
/// simply an empty page. Every returned item carries the three system
/// fields even if the store omitted one.
pub async fn fetch_page(
    store: &dyn TableStore,
    table: &str,
    machine: &str,
    take: Option<usize>,
    token: Option<ContinuationToken>,
) -> StoreResult<MetricsPage> {
    let take = clamp_page_size(take.unwrap_or(DEFAULT_PAGE_SIZE));
    let filter = partition_filter(machine);
    let page = store
        .query_rows(table, Some(&filter), take, token.as_ref())
        .await?;

    let items: Vec<Row> = page.rows.into_iter().map(with_system_fields).collect();
    debug!(
        "page {table}/{machine}: {} items, more={}",
        items.len(),
        page.next.is_some()
    );
    Ok(MetricsPage {
        items,
        continuation_token: page.next,
    })
}

fn with_system_fields(mut row: Row) -> Row {
    for system in [PARTITION_KEY, ROW_KEY, TIMESTAMP] {
        if row.get(system).is_none() {
            row.set(system, FieldValue::Null);
        }
    }
    row
}
