//! HTTP handlers.
//!
//! Endpoints:
//! - POST /predict - Classify one set of measurements
//! - GET /health - Liveness check
//! - GET /ready - Readiness check (reports model load state, never loads)
//! - GET /metrics - Prometheus exposition

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::Span;

use model_service::{BundleFormat, Features, ModelMetadata, ServiceError};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::metrics::{self, Outcome};
use crate::state::AppState;
use crate::validation::IrisInput;

#[derive(Serialize, Debug)]
pub struct PredictResponse {
    pub prediction: String,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: i64,
}

#[derive(Serialize, Debug)]
pub struct ReadyResponse {
    pub ready: bool,
    pub model_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<BundleFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ModelMetadata>,
}

/// Classify a flower from its four measurements.
///
/// The body is taken as raw JSON and validated field by field so that
/// missing, mistyped and out-of-range fields come back as a 422 with details,
/// while a body that is not JSON at all gets a 400.
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody,
) -> Result<Json<PredictResponse>, ApiError> {
    let features = Features::from(IrisInput::from_raw(&body).map_err(ApiError::Validation)?);

    // The first prediction reads the artifact from disk.
    let service = Arc::clone(&state.model_service);
    let span = Span::current();
    let started = Instant::now();
    let result = tokio::task::spawn_blocking(move || span.in_scope(|| service.predict(&features)))
        .await
        .map_err(|e| ApiError::Internal(format!("prediction task failed: {e}")))?;

    let outcome = match &result {
        Ok(_) => Outcome::Success,
        Err(ServiceError::ArtifactNotFound { .. }) => Outcome::ModelMissing,
        Err(_) => Outcome::Failure,
    };
    metrics::record_prediction(outcome, started.elapsed());

    Ok(Json(PredictResponse {
        prediction: result?.into_string(),
    }))
}

/// Health check
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
    })
}

/// Readiness check. Reports whether the model has been loaded.
pub async fn ready_handler(State(state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    let service = &state.model_service;
    let loaded = service.loaded();

    Json(ReadyResponse {
        ready: loaded.is_some(),
        model_path: service.model_path().display().to_string(),
        format: loaded.map(|m| m.format()),
        metadata: loaded.map(|m| m.metadata().clone()),
    })
}

/// Handler for /metrics endpoint
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
