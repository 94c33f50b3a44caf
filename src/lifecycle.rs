//! Server lifecycle management helpers.
//!
//! Encapsulates what would otherwise clutter `main.rs`: building the
//! store client from configuration and wiring the HTTP server.

use crate::middleware;
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use log::{info, warn};
use metriscope_api::{routes, AppState};
use metriscope_commons::ServerConfig;
use metriscope_store::{RestTableStore, TableStore};
use std::sync::Arc;

/// Application components shared across the HTTP workers.
pub struct ApplicationComponents {
    pub store: Option<Arc<dyn TableStore>>,
}

/// Build the table-store client from configuration.
///
/// A missing or unusable connection string is not fatal: the server
/// starts anyway and the API reports the configuration problem on each
/// store-backed request.
pub fn bootstrap(config: &ServerConfig) -> ApplicationComponents {
    let store: Option<Arc<dyn TableStore>> = match &config.connection_string {
        None => {
            warn!("TABLES_CONNECTION_STRING is not set; store-backed endpoints will return 500");
            None
        }
        Some(raw) => match RestTableStore::from_connection_string(raw) {
            Ok(client) => {
                info!("table store client configured");
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!("unusable TABLES_CONNECTION_STRING ({e}); store-backed endpoints will return 500");
                None
            }
        },
    };
    ApplicationComponents { store }
}

/// Wire and run the HTTP server until shutdown.
pub async fn run(config: ServerConfig, components: ApplicationComponents) -> Result<()> {
    let state = web::Data::new(AppState::new(components.store));
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::request_logger())
            .wrap(middleware::cors())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(&bind_addr)?;

    info!("listening on http://{bind_addr}");
    server.run().await?;
    Ok(())
}
