//! Habits API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p habits-api
//! ```
//!
//! Configuration is loaded from environment variables, optionally through a
//! `.env` file.

use habits_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let tracing_config =
        TracingConfig::from_verbosity(config.app.log_verbosity, config.app.env.is_production());
    if let Err(e) = try_init_tracing_with_config(&tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        version = %config.app.version,
        port = config.api.port,
        store = ?config.store_backend(),
        "Starting Habits API Server..."
    );

    if let Err(e) = habits_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
