//! Predictor - process-wide, read-only inference handle
//!
//! Built once at startup from the loaded artifacts and shared behind an
//! `Arc`. Holds exactly one advice mode for the life of the process.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::advice;
use crate::explain::{rank, ExplainError, Explainer, TOP_K};
use crate::features::{FeatureRecord, LayoutInfo, FEATURE_COUNT};
use crate::inference::{Classification, Classifier, LabelPolicy, ModelError, ModelMetadata};
use crate::models::{
    format_risk, round4, AttributionPrediction, PredictResponse, RulesPrediction, TopFeature,
};

/// Which advice mechanism this deployment serves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceMode {
    /// Classifier label, static paragraph
    #[default]
    Rules,
    /// Fixed 0.30 cutoff, attribution-driven sentences
    Attribution,
}

impl AdviceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Attribution => "attribution",
        }
    }

    pub fn label_policy(&self) -> LabelPolicy {
        match self {
            Self::Rules => LabelPolicy::Classifier,
            Self::Attribution => LabelPolicy::attribution(),
        }
    }
}

impl fmt::Display for AdviceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdviceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rules" => Ok(Self::Rules),
            "attribution" => Ok(Self::Attribution),
            other => Err(format!("unknown advice mode {:?} (expected rules or attribution)", other)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Explain(#[from] ExplainError),

    #[error("attribution mode requires an explainer")]
    MissingExplainer,
}

/// Served by `GET /model`
#[derive(Debug, Clone, Serialize)]
pub struct PredictorInfo {
    pub model: ModelMetadata,
    pub explainer: Option<String>,
    pub advice_mode: AdviceMode,
    pub label_policy: LabelPolicy,
    pub layout: LayoutInfo,
}

pub struct Predictor {
    classifier: Box<dyn Classifier>,
    explainer: Option<Box<dyn Explainer>>,
    mode: AdviceMode,
}

impl Predictor {
    pub fn new(
        classifier: Box<dyn Classifier>,
        explainer: Option<Box<dyn Explainer>>,
        mode: AdviceMode,
    ) -> Result<Self, PredictError> {
        if mode == AdviceMode::Attribution && explainer.is_none() {
            return Err(PredictError::MissingExplainer);
        }

        Ok(Self {
            classifier,
            explainer,
            mode,
        })
    }

    pub fn mode(&self) -> AdviceMode {
        self.mode
    }

    pub fn info(&self) -> PredictorInfo {
        PredictorInfo {
            model: self.classifier.metadata().clone(),
            explainer: self.explainer.as_ref().map(|e| e.explainer_type().to_string()),
            advice_mode: self.mode,
            label_policy: self.mode.label_policy(),
            layout: LayoutInfo::current(),
        }
    }

    /// False when both artifacts carry weights and those weights differ,
    /// i.e. the explainer was built for another model.
    pub fn explainer_matches_model(&self) -> bool {
        let explained = self.explainer.as_ref().and_then(|e| e.coefficients());
        match (self.classifier.coefficients(), explained) {
            (Some(model), Some(explained)) => {
                model.len() == explained.len()
                    && model.iter().zip(explained).all(|(a, b)| (a - b).abs() <= 1e-9)
            }
            _ => true,
        }
    }

    pub fn predict(&self, record: &FeatureRecord) -> Result<PredictResponse, PredictError> {
        match self.mode {
            AdviceMode::Rules => self.predict_rules(record).map(PredictResponse::Rules),
            AdviceMode::Attribution => self.predict_attribution(record).map(PredictResponse::Attribution),
        }
    }

    fn predict_rules(&self, record: &FeatureRecord) -> Result<RulesPrediction, PredictError> {
        let input = record.to_vector();
        tracing::trace!(input = ?input.named().collect::<Vec<_>>(), "feature vector");

        let Classification { label, probability } = self.classifier.classify(&input)?;

        tracing::debug!(label, probability, "rules prediction");

        Ok(RulesPrediction {
            prediction: label,
            probability,
            advice: advice::rules_advice(label),
        })
    }

    fn predict_attribution(&self, record: &FeatureRecord) -> Result<AttributionPrediction, PredictError> {
        let explainer = self.explainer.as_ref().ok_or(PredictError::MissingExplainer)?;
        let input = record.to_vector();

        let probability = self.classifier.predict_proba(&input)?;
        let label = self
            .mode
            .label_policy()
            .label_for(probability)
            .unwrap_or_default();

        let scores = explainer.attributions(&input)?;
        if scores.len() != FEATURE_COUNT {
            return Err(ExplainError::ScoreCount {
                expected: FEATURE_COUNT,
                actual: scores.len(),
            }
            .into());
        }

        let top = rank(scores, TOP_K).contributions;
        let advice = advice::attribution_advice(&top, &input);

        tracing::debug!(
            label,
            probability,
            top = ?top.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
            "attribution prediction"
        );

        Ok(AttributionPrediction {
            diabetes_risk: format_risk(probability),
            predicted_label: label,
            top_features: top
                .into_iter()
                .map(|a| TopFeature {
                    feature: a.name,
                    shap_value: round4(a.score),
                })
                .collect(),
            advice,
        })
    }
}
