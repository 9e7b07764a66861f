//! Model service: owns the artifact lifecycle and turns feature vectors into
//! labels.
//!
//! The service starts Unloaded. The first [`ModelService::load`] (or the first
//! [`ModelService::predict`]) reads the artifact; a successful read moves it to
//! Loaded for the rest of the process, a failed one leaves it Unloaded so the
//! next call tries again.

use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{error, info, warn};

use crate::artifact::{ArtifactBundle, ModelMetadata, LEGACY_TARGET_NAMES};
use crate::classifier::Classifier;
use crate::error::{ArtifactError, ServiceError};

/// Default artifact location, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "model/model.pkl";

/// Number of measurements in a feature vector
pub const FEATURE_COUNT: usize = 4;

/// Sepal length, sepal width, petal length, petal width (in that order).
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Features([f64; FEATURE_COUNT]);

impl Features {
    pub const fn new(sepal_length: f64, sepal_width: f64, petal_length: f64, petal_width: f64) -> Self {
        Self([sepal_length, sepal_width, petal_length, petal_width])
    }

    pub const fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

impl From<[f64; FEATURE_COUNT]> for Features {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

/// Prediction result: a class name, or the raw class index when no name is
/// known for it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Which artifact shape the loaded model came from.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BundleFormat {
    Structured,
    Legacy,
}

/// Immutable model state held once the artifact has been read.
#[derive(Debug)]
pub struct LoadedModel {
    classifier: Classifier,
    target_names: Vec<String>,
    metadata: ModelMetadata,
    format: BundleFormat,
}

impl LoadedModel {
    fn from_bundle(bundle: ArtifactBundle) -> Self {
        match bundle {
            ArtifactBundle::Structured(bundle) => Self {
                classifier: bundle.model,
                target_names: bundle.target_names,
                metadata: bundle.metadata,
                format: BundleFormat::Structured,
            },
            ArtifactBundle::Legacy(classifier) => Self {
                classifier,
                target_names: LEGACY_TARGET_NAMES.iter().map(ToString::to_string).collect(),
                metadata: ModelMetadata::default(),
                format: BundleFormat::Legacy,
            },
        }
    }

    pub const fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn target_names(&self) -> &[String] {
        &self.target_names
    }

    pub const fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub const fn format(&self) -> BundleFormat {
        self.format
    }

    /// Map a class index to its target name, falling back to the index itself.
    pub fn label_for(&self, index: usize) -> Label {
        self.target_names
            .get(index)
            .map_or_else(|| Label(index.to_string()), |name| Label(name.clone()))
    }
}

/// Owner of the classifier artifact for the life of the process.
///
/// Share it behind an `Arc`; all methods take `&self`. The load runs at most
/// once even when several threads call [`predict`](Self::predict) on a cold
/// service: late callers wait for the first load to finish.
#[derive(Debug)]
pub struct ModelService {
    model_path: PathBuf,
    model: OnceCell<LoadedModel>,
    reads: AtomicUsize,
}

impl Default for ModelService {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_PATH)
    }
}

impl ModelService {
    /// Create an Unloaded service. No I/O happens until the first load.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            model: OnceCell::new(),
            reads: AtomicUsize::new(0),
        }
    }

    /// Load the artifact if it is not loaded yet.
    ///
    /// # Errors
    ///
    /// - `ArtifactNotFound` if nothing exists at the configured path
    /// - `ArtifactCorrupt` if the file cannot be read or decoded
    pub fn load(&self) -> Result<&LoadedModel, ServiceError> {
        self.model.get_or_try_init(|| self.read_artifact())
    }

    fn read_artifact(&self) -> Result<LoadedModel, ServiceError> {
        let path = self.model_path.as_path();
        info!(path = %path.display(), "Loading model artifact");

        if !path.exists() {
            error!(path = %path.display(), "Model artifact not found");
            return Err(self.not_found());
        }

        self.reads.fetch_add(1, Ordering::SeqCst);
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(self.not_found()),
            Err(e) => return Err(self.corrupt(e.into())),
        };

        let bundle = ArtifactBundle::from_slice(&bytes).map_err(|e| self.corrupt(e))?;
        let model = LoadedModel::from_bundle(bundle);

        match model.format {
            BundleFormat::Structured => info!(
                path = %path.display(),
                model_type = ?model.metadata.model_type,
                accuracy = ?model.metadata.accuracy,
                classes = model.target_names.len(),
                "Model loaded"
            ),
            BundleFormat::Legacy => warn!(
                path = %path.display(),
                model_type = model.classifier.model_type(),
                "Legacy model format detected, using default target names"
            ),
        }

        Ok(model)
    }

    fn not_found(&self) -> ServiceError {
        ServiceError::ArtifactNotFound {
            path: self.model_path.clone(),
        }
    }

    fn corrupt(&self, source: ArtifactError) -> ServiceError {
        error!(path = %self.model_path.display(), error = %source, "Model load failed");
        ServiceError::ArtifactCorrupt {
            path: self.model_path.clone(),
            source,
        }
    }

    /// Classify one feature vector, loading the artifact first if needed.
    ///
    /// # Errors
    ///
    /// Load errors are passed through; classifier failures become
    /// `ServiceError::Inference`.
    pub fn predict(&self, features: &Features) -> Result<Label, ServiceError> {
        let model = self.load()?;

        let index = model
            .classifier
            .predict(features.as_array())
            .map_err(|e| {
                error!(input = ?features.as_array(), error = %e, "Prediction failed");
                ServiceError::from(e)
            })?;

        let label = model.label_for(index);
        info!(input = ?features.as_array(), result = %label, "Prediction made");
        Ok(label)
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    /// The loaded model, if any. Never triggers a load.
    pub fn loaded(&self) -> Option<&LoadedModel> {
        self.model.get()
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Number of times the artifact file has been read.
    pub fn load_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}
