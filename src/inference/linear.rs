//! Logistic regression classifier loaded from a JSON export
//!
//! Artifact layout:
//!
//! ```json
//! {
//!   "model_type": "logistic_regression",
//!   "feature_names": ["HighBP", "HighChol", ...],
//!   "coefficients": [0.75, 0.6, ...],
//!   "intercept": -7.5,
//!   "scaler": { "mean": [...], "scale": [...] }
//! }
//! ```
//!
//! `feature_names` and `scaler` are optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{check_len, read_json, Classification, Classifier, ModelError, ModelMetadata, Scaler};
use crate::features::{layout, FeatureVector};

pub const MODEL_TYPE: &str = "logistic_regression";

fn default_model_type() -> String {
    MODEL_TYPE.to_string()
}

/// Serialized form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticArtifact {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<Scaler>,
}

/// Loaded, validated logistic regression
#[derive(Debug, Clone)]
pub struct LogisticModel {
    artifact: LogisticArtifact,
    metadata: ModelMetadata,
}

impl LogisticModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        tracing::info!("Loading logistic model from: {}", path.display());
        let artifact: LogisticArtifact = read_json(path)?;
        Self::from_artifact(artifact, &path.display().to_string())
    }

    pub fn from_artifact(artifact: LogisticArtifact, source: &str) -> Result<Self, ModelError> {
        if artifact.model_type != MODEL_TYPE {
            return Err(ModelError::Unsupported(format!("model_type {:?}", artifact.model_type)));
        }
        if let Some(names) = &artifact.feature_names {
            layout::validate_names(names.as_slice())?;
        }
        check_len("coefficients", artifact.coefficients.len())?;
        if let Some(scaler) = &artifact.scaler {
            scaler.check()?;
        }

        Ok(Self {
            artifact,
            metadata: ModelMetadata::new(source, MODEL_TYPE),
        })
    }

    /// Log-odds of the positive class
    pub fn decision_function(&self, input: &FeatureVector) -> f64 {
        let scaler = self.artifact.scaler.as_ref();

        self.artifact
            .coefficients
            .iter()
            .zip(input.values().iter())
            .enumerate()
            .map(|(i, (coef, &x))| {
                let z = scaler.map_or(x, |s| s.apply(i, x));
                coef * z
            })
            .sum::<f64>()
            + self.artifact.intercept
    }
}

impl Classifier for LogisticModel {
    fn predict_proba(&self, input: &FeatureVector) -> Result<f64, ModelError> {
        input.validate()?;
        Ok(sigmoid(self.decision_function(input)))
    }

    /// Positive iff the decision function is above zero (p > 0.5)
    fn predict(&self, input: &FeatureVector) -> Result<u8, ModelError> {
        input.validate()?;
        Ok(u8::from(self.decision_function(input) > 0.0))
    }

    fn classify(&self, input: &FeatureVector) -> Result<Classification, ModelError> {
        input.validate()?;
        let decision = self.decision_function(input);
        Ok(Classification {
            label: u8::from(decision > 0.0),
            probability: sigmoid(decision),
        })
    }

    fn coefficients(&self) -> Option<&[f64]> {
        Some(&self.artifact.coefficients)
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::features::layout::FEATURE_LAYOUT;

    /// Coefficients in raw (unscaled) feature units, layout order
    pub const COEFFICIENTS: [f64; 21] = [
        0.75, 0.6, 1.2, 0.065, 0.0, 0.15, 0.25, -0.05, -0.03, -0.05, -0.7,
        0.05, 0.03, 0.55, -0.003, -0.006, 0.1, 0.25, 0.15, -0.03, -0.06,
    ];

    pub const INTERCEPT: f64 = -7.5;

    pub fn model() -> LogisticArtifact {
        LogisticArtifact {
            model_type: MODEL_TYPE.to_string(),
            feature_names: Some(FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect()),
            coefficients: COEFFICIENTS.to_vec(),
            intercept: INTERCEPT,
            scaler: None,
        }
    }

    pub fn loaded() -> LogisticModel {
        LogisticModel::from_artifact(model(), "<memory>").unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::features::record::fixtures::{healthy, high_risk};
    use crate::features::FEATURE_COUNT;

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(40.0) > 0.999_999);
        assert!(sigmoid(-40.0) < 1e-6);
        assert!(sigmoid(-800.0).is_finite());
    }

    #[test]
    fn test_healthy_record_is_negative() {
        let model = loaded();
        let input = healthy().to_vector();

        let p = model.predict_proba(&input).unwrap();
        assert!(p < 0.1, "p = {}", p);
        assert_eq!(model.predict(&input).unwrap(), 0);
    }

    #[test]
    fn test_high_risk_record_is_positive() {
        let model = loaded();
        let input = high_risk().to_vector();

        let p = model.predict_proba(&input).unwrap();
        assert!(p > 0.7, "p = {}", p);
        assert_eq!(model.predict(&input).unwrap(), 1);
    }

    #[test]
    fn test_predict_agrees_with_probability() {
        let model = loaded();
        for record in [healthy(), high_risk()] {
            let input = record.to_vector();
            let p = model.predict_proba(&input).unwrap();
            assert_eq!(model.predict(&input).unwrap() == 1, p > 0.5);
        }
    }

    #[test]
    fn test_classify_matches_separate_calls() {
        let model = loaded();
        for record in [healthy(), high_risk()] {
            let input = record.to_vector();
            let both = model.classify(&input).unwrap();
            assert_eq!(both.label, model.predict(&input).unwrap());
            assert_eq!(both.probability, model.predict_proba(&input).unwrap());
        }
    }

    #[test]
    fn test_rejects_vector_from_other_layout() {
        let model = loaded();
        let mut input = high_risk().to_vector();
        input.layout_hash ^= 0xffff;

        assert!(matches!(model.predict_proba(&input), Err(ModelError::LayoutVersion(_))));
        assert!(matches!(model.classify(&input), Err(ModelError::LayoutVersion(_))));
    }

    #[test]
    fn test_exposes_coefficients() {
        assert_eq!(loaded().coefficients(), Some(&COEFFICIENTS[..]));
    }

    #[test]
    fn test_scaler_is_applied() {
        let mut artifact = model();
        artifact.coefficients = vec![0.0; FEATURE_COUNT];
        artifact.coefficients[3] = 1.0;
        artifact.intercept = 0.0;
        artifact.scaler = Some(Scaler {
            mean: vec![22.0; FEATURE_COUNT],
            scale: vec![2.0; FEATURE_COUNT],
        });
        let model = LogisticModel::from_artifact(artifact, "<memory>").unwrap();

        // BMI 22 sits on the scaler mean
        let input = healthy().to_vector();
        assert_eq!(model.decision_function(&input), 0.0);
        assert_eq!(model.predict(&input).unwrap(), 0);
    }

    #[test]
    fn test_rejects_wrong_coefficient_count() {
        let mut artifact = model();
        artifact.coefficients.pop();
        let err = LogisticModel::from_artifact(artifact, "<memory>").unwrap_err();
        assert!(matches!(err, ModelError::Shape { expected: 21, actual: 20, .. }));
    }

    #[test]
    fn test_rejects_reordered_feature_names() {
        let mut artifact = model();
        if let Some(names) = artifact.feature_names.as_mut() {
            names.swap(3, 4);
        }
        let err = LogisticModel::from_artifact(artifact, "<memory>").unwrap_err();
        assert!(matches!(err, ModelError::Layout(_)));
    }

    #[test]
    fn test_rejects_other_model_type() {
        let mut artifact = model();
        artifact.model_type = "random_forest".to_string();
        assert!(LogisticModel::from_artifact(artifact, "<memory>").is_err());
    }

    #[test]
    fn test_artifact_defaults() {
        let json = serde_json::json!({
            "coefficients": COEFFICIENTS.to_vec(),
            "intercept": INTERCEPT,
        });
        let artifact: LogisticArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(artifact.model_type, MODEL_TYPE);
        assert!(LogisticModel::from_artifact(artifact, "<memory>").is_ok());
    }
}
