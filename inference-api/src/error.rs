//! Mapping of request and model failures to HTTP responses.
//!
//! Only validation problems carry detail back to the caller. Model and
//! internal failures are logged here and answered with a fixed message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use model_service::ServiceError;

use crate::validation::FieldError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request body is not JSON: {0}")]
    NotJson(String),

    #[error("Request validation failed ({} errors)", .0.len())]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Model(#[from] ServiceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotJson(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Model(ServiceError::ArtifactNotFound { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Model(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::NotJson(reason) => {
                warn!(reason = %reason, "Rejected non-JSON request");
                json!({ "error": "Request must be JSON" })
            }
            Self::Validation(details) => {
                warn!(errors = details.len(), "Validation failed");
                json!({ "error": "Validation Error", "details": details })
            }
            Self::Model(ServiceError::ArtifactNotFound { path }) => {
                error!(path = %path.display(), "Model missing");
                json!({ "error": "Model not initialized", "details": "Please run training first" })
            }
            Self::Model(e) => {
                error!(error = %e, "Internal error");
                json!({ "error": "Internal Server Error" })
            }
            Self::Internal(e) => {
                error!(error = %e, "Internal error");
                json!({ "error": "Internal Server Error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
