//! API routes configuration.
//!
//! - GET /api/health - liveness check
//! - GET /api/tables - table names
//! - GET /api/schema/{table} - inferred columns
//! - GET /api/metrics/{table}/{machine}/page - paged rows
//! - GET / - embedded browser UI

use actix_web::web;

use crate::handlers;

/// Configure all routes on an Actix service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health_handler))
            .route("/tables", web::get().to(handlers::tables_handler))
            .route("/schema/{table}", web::get().to(handlers::schema_handler))
            .route(
                "/metrics/{table}/{machine}/page",
                web::get().to(handlers::page_handler),
            ),
    )
    .route("/", web::get().to(handlers::ui_handler));
}
