//! Server-wide middleware constructors.
//!
//! Keeps the Actix application setup focused by providing reusable
//! constructors for the CORS and request-logging layers.

use actix_cors::Cors;
use actix_web::middleware::Logger;

/// Permissive CORS for a read-only browsing tool: any origin may GET.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET"])
        .allow_any_header()
        .max_age(3600)
}

/// Request/response logger: peer, request line, status, size, duration.
pub fn request_logger() -> Logger {
    Logger::new("%a \"%r\" %s %b %Dms")
}
