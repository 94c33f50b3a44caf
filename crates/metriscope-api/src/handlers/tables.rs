//! Table enumeration handler.

use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/tables - all table names, sorted case-insensitively.
///
/// 500 with a "not configured" body when no connection string is set;
/// the check happens before any network call.
pub async fn tables_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = state.store()?;
    let mut names = store.list_tables().await?;
    names.sort_by(|a, b| a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()));
    Ok(HttpResponse::Ok().json(names))
}
