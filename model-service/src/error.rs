//! Error types for the model service.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by [`crate::ModelService`].
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Model file not found at {}. Run training first.", path.display())]
    ArtifactNotFound { path: PathBuf },

    #[error("Failed to load model artifact from {}: {source}", path.display())]
    ArtifactCorrupt {
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),
}

/// Why an artifact on disk could not be turned into a classifier.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode artifact: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid classifier: {0}")]
    Invalid(String),
}

/// Failures while running the classifier on a feature row.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InferenceError {
    #[error("Model expects {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("Ensemble contains no trees")]
    EmptyEnsemble,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let not_found = ServiceError::ArtifactNotFound {
            path: PathBuf::from("model/model.pkl"),
        };
        assert!(not_found.to_string().contains("model/model.pkl"));
        assert!(not_found.to_string().contains("Run training first"));

        let mismatch = InferenceError::FeatureMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(mismatch.to_string(), "Model expects 4 features, got 3");

        let wrapped: ServiceError = InferenceError::EmptyEnsemble.into();
        assert!(wrapped.to_string().contains("no trees"));
    }

    #[test]
    fn test_corrupt_keeps_source() {
        use std::error::Error as _;

        let err = ServiceError::ArtifactCorrupt {
            path: PathBuf::from("bad.json"),
            source: ArtifactError::Invalid("empty tree".to_string()),
        };
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("Invalid classifier: empty tree"));
    }
}
