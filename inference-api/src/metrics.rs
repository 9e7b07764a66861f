//! Prometheus metrics for inference API observability
//!
//! Exposes metrics at /metrics endpoint for scraping by Prometheus. When no
//! recorder is installed (tests, embedded routers) the recording functions
//! are no-ops.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Metric names
pub const PREDICTIONS_TOTAL: &str = "inference_predictions_total";
pub const PREDICTION_LATENCY: &str = "inference_prediction_latency_seconds";

/// Install the global Prometheus recorder and describe our metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(PREDICTIONS_TOTAL, "Prediction requests by outcome");
    describe_histogram!(PREDICTION_LATENCY, "Model service prediction latency in seconds");

    tracing::info!("Metrics system initialized");
    Ok(handle)
}

/// Outcome label for a finished prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    ModelMissing,
    Failure,
}

impl Outcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ModelMissing => "model_missing",
            Self::Failure => "failure",
        }
    }
}

/// Record a prediction and how long the model service took.
pub fn record_prediction(outcome: Outcome, duration: Duration) {
    counter!(PREDICTIONS_TOTAL, "outcome" => outcome.as_str()).increment(1);
    histogram!(PREDICTION_LATENCY).record(duration.as_secs_f64());
}
