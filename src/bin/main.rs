//! Serving process entry point
//!
//! Initializes JSON logging, loads the model artifact (non-fatally), and
//! serves the API. Configuration comes from CLI flags or the `PORT`, `HOST`,
//! and `MODEL_PATH` environment variables.

use clap::Parser;
use std::sync::Arc;

use model_serving::{create_router, AppState, ApiMetricsRegistry, LoadState, ServeConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ServeConfig::parse();

    // Load failure is degraded state, not a startup failure: the process
    // still serves /health and the informational endpoints.
    let load_state = Arc::new(LoadState::load(&config.model_path));

    let metrics = match ApiMetricsRegistry::new() {
        Ok(registry) => Arc::new(registry),
        Err(err) => {
            tracing::error!(error = %err, "Failed to create metrics registry");
            std::process::exit(1);
        }
    };

    let state = AppState::new(load_state, metrics, config.model_path.clone());
    let router = create_router(state);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(addr = %addr, error = %err, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %addr, model_path = %config.model_path, "Serving API listening");

    if let Err(err) = axum::serve(listener, router).await {
        tracing::error!(error = %err, "Server error");
        std::process::exit(1);
    }
}
