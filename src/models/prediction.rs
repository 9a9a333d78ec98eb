//! Prediction response bodies

use serde::{Deserialize, Serialize};

/// Rules mode: `{prediction, probability, advice}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesPrediction {
    pub prediction: u8,
    pub probability: f64,
    pub advice: String,
}

/// Attribution mode body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionPrediction {
    /// Probability with two decimals, e.g. `"0.42"`
    pub diabetes_risk: String,
    pub predicted_label: u8,
    pub top_features: Vec<TopFeature>,
    pub advice: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopFeature {
    pub feature: String,
    /// Rounded to 4 decimals
    pub shap_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Rules(RulesPrediction),
    Attribution(AttributionPrediction),
}

pub fn format_risk(probability: f64) -> String {
    format!("{:.2}", probability)
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_risk() {
        assert_eq!(format_risk(0.0), "0.00");
        assert_eq!(format_risk(0.3), "0.30");
        assert_eq!(format_risk(0.8061), "0.81");
        assert_eq!(format_risk(1.0), "1.00");
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(1.37512), 1.3751);
        assert_eq!(round4(-0.32249), -0.3225);
        assert_eq!(round4(0.0), 0.0);
    }

    #[test]
    fn test_untagged_bodies() {
        let body = PredictResponse::Rules(RulesPrediction {
            prediction: 0,
            probability: 0.25,
            advice: "ok".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"prediction": 0, "probability": 0.25, "advice": "ok"})
        );

        let body = PredictResponse::Attribution(AttributionPrediction {
            diabetes_risk: "0.31".to_string(),
            predicted_label: 1,
            top_features: vec![TopFeature {
                feature: "BMI".to_string(),
                shap_value: 0.5,
            }],
            advice: vec![],
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["top_features"][0]["feature"], "BMI");
        assert_eq!(json["predicted_label"], 1);
    }
}
