//! Shared application state for the inference API.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use model_service::ModelService;

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide model service, constructed by the entry point.
    pub model_service: Arc<ModelService>,

    /// Prometheus handle, present when the recorder was installed.
    pub metrics: Option<PrometheusHandle>,

    /// Service start time for uptime calculations
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(model_service: Arc<ModelService>) -> Self {
        Self {
            model_service,
            metrics: None,
            started_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get service uptime in seconds.
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = AppState::new(Arc::new(ModelService::new("missing.pkl")));
        assert!(state.metrics.is_none());
        assert!(state.uptime_secs() >= 0);
        assert!(!state.model_service.is_loaded());
    }
}
