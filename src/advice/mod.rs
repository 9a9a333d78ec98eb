//! Advice Module - prediction to advisory text
//!
//! Two mechanisms, one per deployment:
//! - rules: fixed paragraph chosen by the label alone
//! - attribution: one sentence per top-ranked feature that trips a rule

pub mod messages;

use crate::explain::Attribution;
use crate::features::layout::{BMI_INDEX, GEN_HLTH_INDEX, PHYS_ACTIVITY_INDEX, SMOKER_INDEX};
use crate::features::FeatureVector;

use messages::*;

/// BMI above this triggers weight-management advice
pub const BMI_ADVICE_THRESHOLD: f64 = 25.0;

/// Paragraph for a positive label, sentence for a negative one
pub fn rules_advice(label: u8) -> String {
    if label == 1 {
        high_risk_paragraph()
    } else {
        LOW_RISK.to_string()
    }
}

fn high_risk_paragraph() -> String {
    let mut text = format!("{}\n{}\n\n", HIGH_RISK_HEADLINE, HIGH_RISK_LEAD);
    for (feature, guidance) in RISK_FACTORS {
        text.push_str(&format!("- {}: {}\n", feature_label(feature), guidance));
    }
    text.push_str(&format!("\n{}\n", HIGH_RISK_CLOSING));
    text
}

/// Advice sentences for the ranked attributions.
///
/// Each entry is checked on its own against the raw input value, so the
/// output follows the ranking and may be empty.
pub fn attribution_advice(top: &[Attribution], input: &FeatureVector) -> Vec<String> {
    top.iter()
        .filter_map(|entry| rule_for(entry.index, input))
        .map(str::to_string)
        .collect()
}

fn rule_for(index: usize, input: &FeatureVector) -> Option<&'static str> {
    let value = input.get(index)?;

    match index {
        BMI_INDEX if value > BMI_ADVICE_THRESHOLD => Some(WEIGHT_MANAGEMENT),
        SMOKER_INDEX if value == 1.0 => Some(SMOKING_CESSATION),
        PHYS_ACTIVITY_INDEX if value == 0.0 => Some(EXERCISE),
        GEN_HLTH_INDEX => Some(HEALTH_HABITS),
        _ => None,
    }
}
