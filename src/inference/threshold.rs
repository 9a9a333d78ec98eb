//! Label Threshold Policy
//!
//! Rules mode reports the classifier's own label. Attribution mode overrides
//! it with a fixed cutoff on the positive-class probability.

use serde::{Deserialize, Serialize};

/// Cutoff used in attribution mode (p >= 0.30 → positive)
pub const ATTRIBUTION_THRESHOLD: f64 = 0.30;

/// How the reported label is derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "threshold", rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Whatever `Classifier::predict` returns
    Classifier,
    /// Positive iff probability >= threshold
    Fixed(f64),
}

impl LabelPolicy {
    pub fn attribution() -> Self {
        Self::Fixed(ATTRIBUTION_THRESHOLD)
    }

    /// Apply a fixed cutoff; `None` means defer to the classifier
    pub fn label_for(&self, probability: f64) -> Option<u8> {
        match self {
            Self::Classifier => None,
            Self::Fixed(threshold) => Some(u8::from(probability >= *threshold)),
        }
    }
}
