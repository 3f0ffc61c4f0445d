//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use habits_common::{AppConfig, AppError, StoreBackend};
use habits_db::{MemoryStore, MongoStore};
use habits_service::ServiceContext;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let router = apply_middleware(
        create_router(&state),
        &config.cors,
        config.app.env.is_production(),
    );
    router.with_state(state)
}

/// Open the configured store and create AppState
///
/// Development runs on the seeded in-memory store, every other environment
/// on MongoDB.
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let service_context = match config.store_backend() {
        StoreBackend::Memory => {
            info!("Using seeded in-memory store");
            let store = MemoryStore::seeded()?;
            ServiceContext::from_config(Arc::new(store), &config)
        }
        StoreBackend::Mongo => {
            info!(database = %config.database.name, "Connecting to MongoDB...");
            let store = MongoStore::connect(&config.database).await?;
            info!("MongoDB connection established");
            ServiceContext::from_config(Arc::new(store), &config)
        }
    };

    Ok(AppState::new(service_context, config))
}

/// Serve the application on a bound listener until `shutdown` resolves
///
/// The peer address is made available to handlers through `ConnectInfo`.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(|e| AppError::Internal(e.into()))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state.clone());

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {address}: {e}")))?;

    info!(
        "Server listening on http://{}{}",
        address,
        state.config().api.base_path()
    );

    serve(listener, app, shutdown_signal()).await?;

    info!("Server stopped, closing store");
    state.service_context().store().disconnect().await?;

    Ok(())
}

/// Resolve on SIGINT (Ctrl-C) or, on Unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
