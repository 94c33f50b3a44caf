//! Embedded browser UI.
//!
//! The whole UI is one self-contained HTML page compiled into the
//! binary, so the server ships as a single artifact with no asset
//! directory or build step.

use actix_web::{HttpResponse, Responder};

const INDEX_HTML: &str = include_str!("../../ui/index.html");

/// GET / - the metrics browser page.
pub async fn ui_handler() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}
