//! HTTP error mapping.
//!
//! Two failure classes reach the wire, both as 500 with a plain-text
//! problem body: the store was never configured, or the store rejected
//! a query (its own error text is passed through verbatim). Missing
//! data is never an error at this layer.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use metriscope_commons::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Fixed message; raised before any store call when no connection
    /// string is configured.
    #[error("table store connection is not configured")]
    NotConfigured,

    /// Store-reported failure, surfaced with the store's message.
    #[error("{0}")]
    Store(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotConfigured => ApiError::NotConfigured,
            other => ApiError::Store(other.to_string()),
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        log::warn!("request failed: {self}");
        HttpResponse::InternalServerError()
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
