//! Debt Settlement Engine - API Server Binary
//!
//! This binary starts the HTTP API server for the settlement engine.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin settlement-api
//!
//! # Run with environment variables
//! API_PORT=9090 API_CURRENCY=EUR API_SEED_PATH=groups.json cargo run --bin settlement-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_CURRENCY` - Currency for requests that omit one (default: USD)
//! * `API_SEED_PATH` - JSON file of group snapshots to load at startup

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use domain_settlement::InMemoryGroupStore;
use interface_api::{config::ApiConfig, create_router, seed, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration and seed data, and starts the
/// HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The seed file cannot be read or parsed
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config()?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        currency = %config.currency,
        "Starting Debt Settlement API Server"
    );

    let store = Arc::new(InMemoryGroupStore::new());
    if let Some(path) = &config.seed_path {
        let snapshots = seed::read_seed(path).with_context(|| format!("loading seed data from {}", path))?;
        seed::load_into(&store, snapshots).await;
    }

    let app = create_router(AppState::new(store, config.clone()));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables.
///
/// Falls back to defaults when the environment cannot be deserialized.
fn load_config() -> anyhow::Result<ApiConfig> {
    let config = ApiConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Ignoring API_* environment: {}", e);
        ApiConfig::default()
    });
    config.validate()?;
    Ok(config)
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
