//! Model Service - classifier artifact lifecycle
//!
//! This crate owns the trained classifier used by the inference API:
//! - Reads the artifact lazily on first use, at most once per process
//! - Accepts both the structured bundle and the legacy bare-classifier shape
//! - Maps predicted class indices to human-readable labels
//!
//! # Example
//!
//! ```no_run
//! use model_service::{Features, ModelService};
//!
//! let service = ModelService::new("model/model.pkl");
//! let label = service.predict(&Features::new(5.1, 3.5, 1.4, 0.2))?;
//! println!("Prediction: {label}");
//! # Ok::<(), model_service::ServiceError>(())
//! ```

pub mod artifact;
pub mod classifier;
pub mod error;
pub mod service;

// Re-export main types for convenience
pub use artifact::{ArtifactBundle, ModelBundle, ModelMetadata, LEGACY_TARGET_NAMES};
pub use classifier::{Classifier, FittedTree, ForestClassifier, TreeClassifier};
pub use error::{ArtifactError, InferenceError, ServiceError};
pub use service::{
    BundleFormat, Features, Label, LoadedModel, ModelService, DEFAULT_MODEL_PATH, FEATURE_COUNT,
};
