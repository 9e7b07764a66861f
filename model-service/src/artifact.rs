//! On-disk model artifact format.
//!
//! An artifact is a single JSON document in one of two shapes:
//!
//! - **Structured**: `{"model": <classifier>, "target_names": [...], "metadata": {...}}`
//! - **Legacy**: the bare `<classifier>` document, as written by early
//!   training runs before target names and metadata were bundled.
//!
//! The shape is decided once, at decode time, by the presence of a top-level
//! `model` key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::classifier::Classifier;
use crate::error::ArtifactError;

/// Target names assumed for legacy artifacts. Only meaningful for the
/// three-class Iris models those artifacts were trained on.
pub const LEGACY_TARGET_NAMES: [&str; 3] = ["setosa", "versicolor", "virginica"];

/// Training metadata carried alongside the classifier.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ModelMetadata {
    /// Held-out accuracy reported by the training job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,

    /// Model family, e.g. `RandomForestClassifier`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,

    /// Any other keys the producer chose to record
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelMetadata {
    pub fn new(accuracy: f64, model_type: impl Into<String>) -> Self {
        Self {
            accuracy: Some(accuracy),
            model_type: Some(model_type.into()),
            extra: Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accuracy.is_none() && self.model_type.is_none() && self.extra.is_empty()
    }
}

/// Structured artifact: classifier plus target names plus metadata.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ModelBundle {
    pub model: Classifier,

    #[serde(default)]
    pub target_names: Vec<String>,

    #[serde(default)]
    pub metadata: ModelMetadata,
}

impl ModelBundle {
    pub fn new(model: impl Into<Classifier>, target_names: Vec<String>, metadata: ModelMetadata) -> Self {
        Self {
            model: model.into(),
            target_names,
            metadata,
        }
    }

    /// Write the bundle as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

/// Decoded artifact, tagged by the shape it was stored in.
#[derive(Debug, Clone)]
pub enum ArtifactBundle {
    Structured(ModelBundle),
    Legacy(Classifier),
}

impl ArtifactBundle {
    /// Decode and validate an artifact document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let value: Value = serde_json::from_slice(bytes)?;

        let bundle = if value.get("model").is_some() {
            Self::Structured(serde_json::from_value(value)?)
        } else {
            Self::Legacy(serde_json::from_value(value)?)
        };

        bundle.classifier().validate()?;
        Ok(bundle)
    }

    pub const fn classifier(&self) -> &Classifier {
        match self {
            Self::Structured(bundle) => &bundle.model,
            Self::Legacy(classifier) => classifier,
        }
    }

    pub const fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }
}
