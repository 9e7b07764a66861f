//! Inference API entry point.
//!
//! Reads configuration from the environment (and `.env`), sets up tracing,
//! builds the single model service instance and serves the router until
//! Ctrl-C.

use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use inference_api::{metrics, AppState, ServerConfig};
use model_service::ModelService;
use serving_core::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the variables directly.
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env()?;
    serving_core::init_with_format("inference-api", LogFormat::for_mode(config.is_debug()));

    let model_service = Arc::new(ModelService::new(&config.model_path));
    let mut state = AppState::new(model_service);
    match metrics::init_metrics() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!(error = %e, "Prometheus recorder unavailable, /metrics disabled"),
    }

    let app = inference_api::app(Arc::new(state));

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {bind_addr}"))?;

    info!(
        bind_addr = %bind_addr,
        model_path = %config.model_path.display(),
        environment = %config.environment,
        debug = config.is_debug(),
        "Inference API starting"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    info!("Inference API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
