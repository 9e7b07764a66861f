//! Serving Core Library
//!
//! Tracing setup shared by the inference API and the training job:
//! - Human-readable output for development
//! - JSON lines for production log shipping

use tracing_subscriber::EnvFilter;

/// Output format for the global tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Pick the format from the debug/production mode flag.
    pub const fn for_mode(debug: bool) -> Self {
        if debug {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Default filter directive when `RUST_LOG` is unset.
///
/// Crate names use underscores in targets, so `inference-api` becomes
/// `inference_api`.
pub fn default_directive(service_name: &str, http_level: &str) -> String {
    format!(
        "{}=info,model_service=info,tower_http={}",
        service_name.replace('-', "_"),
        http_level
    )
}

fn filter_for(service_name: &str, http_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(service_name, http_level)))
}

/// Initialize tracing with standard configuration
pub fn init_tracing(service_name: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(service_name, "debug"))
        .init();
}

/// Initialize tracing with JSON output (for production)
pub fn init_tracing_json(service_name: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(service_name, "info"))
        .json()
        .init();
}

/// Initialize tracing in the given format.
pub fn init_with_format(service_name: &str, format: LogFormat) {
    match format {
        LogFormat::Pretty => init_tracing(service_name),
        LogFormat::Json => init_tracing_json(service_name),
    }
}
