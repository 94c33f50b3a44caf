// Metriscope server entrypoint
//!
//! The heavy lifting (store bootstrap, middleware wiring, HTTP server
//! setup) lives in dedicated modules so this file remains a thin
//! orchestrator.

mod lifecycle;
mod logging;
mod middleware;

use anyhow::Result;
use log::info;
use metriscope_commons::ServerConfig;

#[actix_web::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env();

    // Logging before any other side effects
    logging::init_logging(&config.log_level, &config.log_format)?;

    info!(
        "Metriscope v{} starting on http://{}",
        env!("CARGO_PKG_VERSION"),
        config.bind_addr()
    );

    let components = lifecycle::bootstrap(&config);
    lifecycle::run(config, components).await
}
