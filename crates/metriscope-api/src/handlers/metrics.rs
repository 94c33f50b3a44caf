//! Paged metrics handler.

use actix_web::{web, HttpResponse};
use metriscope_commons::ContinuationToken;
use metriscope_core::fetch_page;
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::PageResponse;
use crate::state::AppState;

/// Query parameters for the page endpoint. `take` is free-form text so
/// out-of-range values (negatives included) clamp and unparsable ones
/// default instead of being rejected; an empty `ct` means "first page".
#[derive(Debug, Deserialize)]
pub struct PageParams {
    take: Option<String>,
    ct: Option<String>,
}

/// GET /api/metrics/{table}/{machine}/page?take=&ct= - one page of rows
/// for a machine (take clamped 1-500, default 25), plus the token for
/// the next page or null when exhausted. An unknown machine is a 200
/// with an empty item list, not an error.
pub async fn page_handler(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, ApiError> {
    let store = state.store()?;
    let (table, machine) = path.into_inner();
    let take = params.take.as_deref().and_then(super::parse_size_param);
    let token = params
        .ct
        .as_deref()
        .and_then(ContinuationToken::new);

    let page = fetch_page(store.as_ref(), &table, &machine, take, token).await?;
    Ok(HttpResponse::Ok().json(PageResponse::from(page)))
}
