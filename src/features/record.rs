//! Feature Record - the 21-field survey answers accepted by `/predict`

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::coerce;
use super::layout::FEATURE_COUNT;
use super::vector::FeatureVector;

/// One person's health-survey answers.
///
/// Ranges below are only enforced when strict validation is enabled; by
/// default every well-typed value is passed to the classifier as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FeatureRecord {
    #[serde(rename = "HighBP", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub high_bp: i64,

    #[serde(rename = "HighChol", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub high_chol: i64,

    #[serde(rename = "CholCheck", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub chol_check: i64,

    #[serde(rename = "BMI", deserialize_with = "coerce::float")]
    #[validate(range(min = 10.0, max = 100.0))]
    pub bmi: f64,

    #[serde(rename = "Smoker", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub smoker: i64,

    #[serde(rename = "Stroke", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub stroke: i64,

    #[serde(rename = "HeartDiseaseorAttack", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub heart_disease_or_attack: i64,

    #[serde(rename = "PhysActivity", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub phys_activity: i64,

    #[serde(rename = "Fruits", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub fruits: i64,

    #[serde(rename = "Veggies", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub veggies: i64,

    #[serde(rename = "HvyAlcoholConsump", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub hvy_alcohol_consump: i64,

    #[serde(rename = "AnyHealthcare", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub any_healthcare: i64,

    #[serde(rename = "NoDocbcCost", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub no_docbc_cost: i64,

    /// 1 = excellent .. 5 = poor
    #[serde(rename = "GenHlth", deserialize_with = "coerce::int")]
    #[validate(range(min = 1, max = 5))]
    pub gen_hlth: i64,

    #[serde(rename = "MentHlth", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 30))]
    pub ment_hlth: i64,

    #[serde(rename = "PhysHlth", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 30))]
    pub phys_hlth: i64,

    #[serde(rename = "DiffWalk", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub diff_walk: i64,

    #[serde(rename = "Sex", deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 1))]
    pub sex: i64,

    /// 13-level bucket, 1 = 18-24 .. 13 = 80+
    #[serde(rename = "Age", deserialize_with = "coerce::int")]
    #[validate(range(min = 1, max = 13))]
    pub age: i64,

    #[serde(rename = "Education", deserialize_with = "coerce::int")]
    #[validate(range(min = 1, max = 6))]
    pub education: i64,

    #[serde(rename = "Income", deserialize_with = "coerce::int")]
    #[validate(range(min = 1, max = 8))]
    pub income: i64,
}

impl FeatureRecord {
    /// Build the classifier input.
    ///
    /// Order must match `FEATURE_LAYOUT` exactly.
    pub fn to_vector(&self) -> FeatureVector {
        let values: [f64; FEATURE_COUNT] = [
            self.high_bp as f64,
            self.high_chol as f64,
            self.chol_check as f64,
            self.bmi,
            self.smoker as f64,
            self.stroke as f64,
            self.heart_disease_or_attack as f64,
            self.phys_activity as f64,
            self.fruits as f64,
            self.veggies as f64,
            self.hvy_alcohol_consump as f64,
            self.any_healthcare as f64,
            self.no_docbc_cost as f64,
            self.gen_hlth as f64,
            self.ment_hlth as f64,
            self.phys_hlth as f64,
            self.diff_walk as f64,
            self.sex as f64,
            self.age as f64,
            self.education as f64,
            self.income as f64,
        ];

        FeatureVector::from_values(values)
    }
}
