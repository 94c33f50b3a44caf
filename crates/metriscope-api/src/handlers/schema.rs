//! Schema inference handler.

use actix_web::{web, HttpResponse};
use metriscope_core::infer_schema;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the schema endpoint. Both are free-form text:
/// an out-of-range `sample` (negatives included) clamps, an unparsable
/// one falls back to the default rather than turning into a 400, and a
/// blank `machine` means "no partition filter".
#[derive(Debug, Deserialize)]
pub struct SchemaParams {
    machine: Option<String>,
    sample: Option<String>,
}

/// GET /api/schema/{table}?machine=&sample= - inferred, ordered column
/// names for a table, from a single sampled page (clamped 1-500,
/// default 50).
pub async fn schema_handler(
    state: web::Data<AppState>,
    table: web::Path<String>,
    params: web::Query<SchemaParams>,
) -> Result<HttpResponse, ApiError> {
    let store = state.store()?;
    let machine = params
        .machine
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());
    let sample = params.sample.as_deref().and_then(super::parse_size_param);

    let columns = infer_schema(store.as_ref(), &table, machine, sample).await?;
    Ok(HttpResponse::Ok().json(columns))
}
