//! Inference Module - classifier artifacts
//!
//! Every artifact is loaded once at startup and is read-only afterwards.
//! The artifact kind is picked from the file extension:
//! - `.json` → logistic regression exported as coefficients
//! - `.onnx` → ONNX graph evaluated by ONNX Runtime (`onnx` feature)

pub mod linear;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod threshold;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::features::{FeatureVector, LayoutMismatchError, LayoutVersionError, FEATURE_COUNT};

pub use linear::LogisticModel;
pub use threshold::LabelPolicy;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid artifact {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported artifact: {0}")]
    Unsupported(String),

    #[error("expected {expected} {what}, got {actual}")]
    Shape {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    #[error(transparent)]
    LayoutVersion(#[from] LayoutVersionError),

    #[error("inference failed: {0}")]
    Runtime(String),
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub features: usize,
    pub loaded_at: DateTime<Utc>,
}

impl ModelMetadata {
    pub fn new(model_path: &str, model_type: &str) -> Self {
        Self {
            model_path: model_path.to_string(),
            model_type: model_type.to_string(),
            features: FEATURE_COUNT,
            loaded_at: Utc::now(),
        }
    }
}

/// Label and positive-class probability from one evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: u8,
    pub probability: f64,
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// A trained binary classifier over the fixed feature layout
pub trait Classifier: Send + Sync {
    /// Probability of the positive class
    fn predict_proba(&self, input: &FeatureVector) -> Result<f64, ModelError>;

    /// Hard label using the classifier's own decision rule
    fn predict(&self, input: &FeatureVector) -> Result<u8, ModelError>;

    /// Label and probability together. Runtimes that produce both in one
    /// pass override this.
    fn classify(&self, input: &FeatureVector) -> Result<Classification, ModelError> {
        Ok(Classification {
            label: self.predict(input)?,
            probability: self.predict_proba(input)?,
        })
    }

    /// Weights in layout order, for models that have them
    fn coefficients(&self) -> Option<&[f64]> {
        None
    }

    fn metadata(&self) -> &ModelMetadata;
}

/// Load a classifier artifact, dispatching on extension
pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, ModelError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => Ok(Box::new(LogisticModel::load(path)?)),
        #[cfg(feature = "onnx")]
        Some("onnx") => Ok(Box::new(onnx::OnnxClassifier::load(path)?)),
        #[cfg(not(feature = "onnx"))]
        Some("onnx") => Err(ModelError::Unsupported(format!(
            "{} needs the `onnx` feature",
            path.display()
        ))),
        _ => Err(ModelError::Unsupported(format!(
            "{} (expected .json or .onnx)",
            path.display()
        ))),
    }
}

/// Read and parse a JSON artifact
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: display.clone(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| ModelError::Parse { path: display, source })
}

/// Shared scaler block, `z = (x - mean) / scale`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    pub fn check(&self) -> Result<(), ModelError> {
        check_len("scaler means", self.mean.len())?;
        check_len("scaler scales", self.scale.len())?;
        if let Some(i) = self.scale.iter().position(|s| *s == 0.0 || !s.is_finite()) {
            return Err(ModelError::Unsupported(format!("scaler scale[{}] must be finite and non-zero", i)));
        }
        Ok(())
    }

    pub fn apply(&self, index: usize, value: f64) -> f64 {
        (value - self.mean[index]) / self.scale[index]
    }
}

pub(crate) fn check_len(what: &'static str, actual: usize) -> Result<(), ModelError> {
    if actual != FEATURE_COUNT {
        return Err(ModelError::Shape {
            what,
            expected: FEATURE_COUNT,
            actual,
        });
    }
    Ok(())
}
