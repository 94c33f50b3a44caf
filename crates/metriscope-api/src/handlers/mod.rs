//! HTTP request handlers
//!
//! ## Endpoints
//! - GET /api/health - liveness check, never touches the store
//! - GET /api/tables - table names, sorted case-insensitively
//! - GET /api/schema/{table} - inferred column order
//! - GET /api/metrics/{table}/{machine}/page - one page of rows
//! - GET / - embedded browser UI

mod health;
mod metrics;
mod schema;
mod tables;
mod ui;

pub use health::health_handler;
pub use metrics::page_handler;
pub use schema::schema_handler;
pub use tables::tables_handler;
pub use ui::ui_handler;

/// Parse a size query parameter (`take`/`sample`). Unparsable text
/// falls back to the handler's default; negative numbers are kept and
/// floored at zero so the downstream range clamp lands them on 1
/// rather than on the default.
pub(crate) fn parse_size_param(raw: &str) -> Option<usize> {
    raw.trim().parse::<i64>().ok().map(|n| n.max(0) as usize)
}
