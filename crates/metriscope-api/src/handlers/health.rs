//! Liveness handler.

use actix_web::{HttpResponse, Responder};

use crate::models::HealthResponse;

/// GET /api/health - simple liveness check.
///
/// Returns 200 with the current server time. Deliberately does not
/// touch the store, so it stays green while the store is down or
/// unconfigured.
pub async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::now())
}
