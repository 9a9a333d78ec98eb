use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::{Attribution, ExplainResult};
use crate::features::{feature_name, layout, FeatureVector};
use crate::inference::{check_len, read_json, ModelError, Scaler};

/// Number of features reported per prediction
pub const TOP_K: usize = 3;

pub const LINEAR_EXPLAINER: &str = "linear";

#[derive(Debug, thiserror::Error)]
pub enum ExplainError {
    #[error(transparent)]
    Artifact(#[from] ModelError),

    #[error("explainer produced {actual} scores, expected {expected}")]
    ScoreCount { expected: usize, actual: usize },
}

/// Computes one signed score per layout column for a single record
pub trait Explainer: Send + Sync {
    fn attributions(&self, input: &FeatureVector) -> Result<Vec<Attribution>, ExplainError>;

    fn explainer_type(&self) -> &str;

    /// Weights of the explained model, when the explainer carries them
    fn coefficients(&self) -> Option<&[f64]> {
        None
    }
}

/// Load an explainer artifact
pub fn load_explainer(path: &Path) -> Result<Box<dyn Explainer>, ExplainError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if !is_json {
        return Err(ModelError::Unsupported(format!("{} (expected .json explainer)", path.display())).into());
    }

    Ok(Box::new(LinearExplainer::load(path)?))
}

// ============================================================================
// LINEAR EXPLAINER
// ============================================================================

fn default_explainer_type() -> String {
    LINEAR_EXPLAINER.to_string()
}

/// Serialized linear explainer.
///
/// `background_mean` is in raw feature units; the scaler, if any, is the
/// one the model was trained behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    #[serde(default = "default_explainer_type")]
    pub explainer_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub background_mean: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<Scaler>,
}

/// Exact Shapley values of a linear model in log-odds space, assuming
/// independent features: `coef_i * (z_i - mean(z_i))`.
#[derive(Debug, Clone)]
pub struct LinearExplainer {
    coefficients: Vec<f64>,
    scaler: Option<Scaler>,
    /// Background mean, already scaled
    baseline: Vec<f64>,
}

impl LinearExplainer {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        tracing::info!("Loading linear explainer from: {}", path.display());
        let artifact: LinearArtifact = read_json(path)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: LinearArtifact) -> Result<Self, ModelError> {
        if artifact.explainer_type != LINEAR_EXPLAINER {
            return Err(ModelError::Unsupported(format!("explainer_type {:?}", artifact.explainer_type)));
        }
        if let Some(names) = &artifact.feature_names {
            layout::validate_names(names.as_slice())?;
        }
        check_len("coefficients", artifact.coefficients.len())?;
        check_len("background means", artifact.background_mean.len())?;
        if let Some(scaler) = &artifact.scaler {
            scaler.check()?;
        }

        let baseline = artifact
            .background_mean
            .iter()
            .enumerate()
            .map(|(i, &m)| artifact.scaler.as_ref().map_or(m, |s| s.apply(i, m)))
            .collect();

        Ok(Self {
            coefficients: artifact.coefficients,
            scaler: artifact.scaler,
            baseline,
        })
    }
}

impl Explainer for LinearExplainer {
    fn attributions(&self, input: &FeatureVector) -> Result<Vec<Attribution>, ExplainError> {
        input.validate().map_err(ModelError::from)?;

        let scores = input
            .values()
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let z = self.scaler.as_ref().map_or(x, |s| s.apply(i, x));
                Attribution {
                    name: feature_name(i).unwrap_or("unknown").to_string(),
                    index: i,
                    score: self.coefficients[i] * (z - self.baseline[i]),
                }
            })
            .collect();

        Ok(scores)
    }

    fn explainer_type(&self) -> &str {
        LINEAR_EXPLAINER
    }

    fn coefficients(&self) -> Option<&[f64]> {
        Some(&self.coefficients)
    }
}

// ============================================================================
// RANKING
// ============================================================================

/// Keep the `k` largest |score| entries, highest first.
///
/// The sort is stable, so equal magnitudes keep layout order.
pub fn rank(mut contributions: Vec<Attribution>, k: usize) -> ExplainResult {
    contributions.sort_by(|a, b| {
        b.score
            .abs()
            .partial_cmp(&a.score.abs())
            .unwrap_or(Ordering::Equal)
    });
    contributions.truncate(k);

    ExplainResult { contributions }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::features::record::fixtures::{healthy, high_risk};
    use crate::features::FEATURE_COUNT;
    use std::io::Write;

    fn attr(name: &str, index: usize, score: f64) -> Attribution {
        Attribution {
            name: name.to_string(),
            index,
            score,
        }
    }

    #[test]
    fn test_one_score_per_column() {
        let scores = loaded().attributions(&healthy().to_vector()).unwrap();
        assert_eq!(scores.len(), FEATURE_COUNT);
        for (i, a) in scores.iter().enumerate() {
            assert_eq!(a.index, i);
            assert_eq!(a.name, layout::FEATURE_LAYOUT[i]);
        }
    }

    #[test]
    fn test_linear_scores() {
        let scores = loaded().attributions(&high_risk().to_vector()).unwrap();

        // GenHlth: 0.55 * (5 - 2.5)
        assert!((scores[13].score - 1.375).abs() < 1e-9);
        // Income: -0.06 * (3 - 6.05)
        assert!((scores[20].score - 0.183).abs() < 1e-9);
        // Smoker has no weight
        assert_eq!(scores[4].score, 0.0);
    }

    #[test]
    fn test_rejects_vector_from_other_layout() {
        let mut input = high_risk().to_vector();
        input.version += 1;

        let err = loaded().attributions(&input).unwrap_err();
        assert!(matches!(err, ExplainError::Artifact(ModelError::LayoutVersion(_))));
    }

    #[test]
    fn test_scaled_baseline() {
        let mut artifact = artifact();
        artifact.scaler = Some(Scaler {
            mean: vec![1.0; FEATURE_COUNT],
            scale: vec![4.0; FEATURE_COUNT],
        });
        let explainer = LinearExplainer::from_artifact(artifact).unwrap();
        let scores = explainer.attributions(&high_risk().to_vector()).unwrap();

        // GenHlth: 0.55 * ((5 - 1) / 4 - (2.5 - 1) / 4)
        assert!((scores[13].score - 0.55 * 0.625).abs() < 1e-9);
    }

    #[test]
    fn test_rank_top_three_by_magnitude() {
        let scores = loaded().attributions(&high_risk().to_vector()).unwrap();
        let result = rank(scores, TOP_K);

        let names: Vec<&str> = result.contributions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["GenHlth", "Age", "HighBP"]);
    }

    #[test]
    fn test_rank_uses_absolute_value() {
        let result = rank(
            vec![attr("A", 0, 0.1), attr("B", 1, -0.9), attr("C", 2, 0.5), attr("D", 3, -0.2)],
            3,
        );
        let names: Vec<&str> = result.contributions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "D"]);
        assert_eq!(result.contributions[0].score, -0.9);
    }

    #[test]
    fn test_rank_ties_keep_layout_order() {
        let result = rank(
            vec![attr("A", 0, 0.3), attr("B", 1, -0.3), attr("C", 2, 0.3), attr("D", 3, 0.3)],
            3,
        );
        let names: Vec<&str> = result.contributions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_rank_short_input() {
        let result = rank(vec![attr("A", 0, 0.3)], TOP_K);
        assert_eq!(result.contributions.len(), 1);
    }

    #[test]
    fn test_rejects_short_background() {
        let mut artifact = artifact();
        artifact.background_mean.truncate(5);
        assert!(LinearExplainer::from_artifact(artifact).is_err());
    }

    #[test]
    fn test_load_explainer_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(serde_json::to_string(&artifact()).unwrap().as_bytes()).unwrap();

        let explainer = tokio_test::assert_ok!(load_explainer(file.path()));
        assert_eq!(explainer.explainer_type(), LINEAR_EXPLAINER);
    }

    #[test]
    fn test_load_explainer_rejects_pickle() {
        assert!(load_explainer(Path::new("explainer.pkl")).is_err());
    }
}
