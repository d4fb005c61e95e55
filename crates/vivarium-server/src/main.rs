//! API server binary for the Vivarium simulation.
//!
//! Wires together the rule table, the engine seam, and the HTTP
//! surface. The synthetic engine ships as the stand-in collaborator;
//! linking the real engine means swapping one constructor here.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `vivarium-config.yaml` (defaults when
//!    the file is absent)
//! 2. Initialize structured logging (tracing)
//! 3. Build the shared application state (rules, intervals, engine,
//!    request deadline)
//! 4. Bind and serve until terminated

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;
use vivarium_core::SyntheticEngine;
use vivarium_server::config::{ApiConfig, ConfigError};
use vivarium_server::server::{ServerConfig, start_server};
use vivarium_server::state::AppState;

/// Default configuration file path, relative to the working directory.
const CONFIG_PATH: &str = "vivarium-config.yaml";

/// Application entry point for the API server.
///
/// # Errors
///
/// Returns an error if the configuration file is unreadable or the
/// server fails to bind.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with_target(true)
        .init();

    info!("vivarium-server starting");
    info!(
        host = config.host,
        port = config.port,
        request_timeout_ms = config.request_timeout_ms,
        "Configuration loaded"
    );

    // 3. Build shared application state.
    let engine = Arc::new(SyntheticEngine);
    let state = Arc::new(
        AppState::new(engine)
            .with_request_timeout(Duration::from_millis(config.request_timeout_ms)),
    );

    // 4. Bind and serve.
    let server_config = ServerConfig {
        host: config.host,
        port: config.port,
    };
    start_server(&server_config, state).await?;

    Ok(())
}

/// Load the YAML configuration, falling back to defaults when the file
/// does not exist. A present-but-broken file is a startup error.
fn load_config() -> Result<ApiConfig, ConfigError> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        ApiConfig::from_file(path)
    } else {
        let mut config = ApiConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}
