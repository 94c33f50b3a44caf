// Metriscope API Library
//
// The REST layer: HTTP handlers, routes, response models, the shared
// application state, and the embedded browser UI.

pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
