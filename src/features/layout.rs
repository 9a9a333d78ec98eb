//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the column order the classifier was trained on**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! Model and explainer artifacts that declare `feature_names` are checked
//! against this layout when they are loaded.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    // === Cardiovascular (0-2) ===
    "HighBP",               // 0: High blood pressure (0/1)
    "HighChol",             // 1: High cholesterol (0/1)
    "CholCheck",            // 2: Cholesterol check in last 5 years (0/1)

    // === Body / habits (3-4) ===
    "BMI",                  // 3: Body mass index (continuous)
    "Smoker",               // 4: Smoked 100+ cigarettes in life (0/1)

    // === History (5-6) ===
    "Stroke",               // 5: Ever had a stroke (0/1)
    "HeartDiseaseorAttack", // 6: Coronary heart disease or MI (0/1)

    // === Lifestyle (7-10) ===
    "PhysActivity",         // 7: Physical activity in past 30 days (0/1)
    "Fruits",               // 8: Fruit 1+ times per day (0/1)
    "Veggies",              // 9: Vegetables 1+ times per day (0/1)
    "HvyAlcoholConsump",    // 10: Heavy drinker (0/1)

    // === Access to care (11-12) ===
    "AnyHealthcare",        // 11: Any health coverage (0/1)
    "NoDocbcCost",          // 12: Skipped doctor because of cost (0/1)

    // === Self-reported health (13-16) ===
    "GenHlth",              // 13: General health, 1 = excellent .. 5 = poor
    "MentHlth",             // 14: Days of poor mental health (0-30)
    "PhysHlth",             // 15: Days of physical illness (0-30)
    "DiffWalk",             // 16: Difficulty walking (0/1)

    // === Demographics (17-20) ===
    "Sex",                  // 17: 0 = female, 1 = male
    "Age",                  // 18: 13-level age bucket
    "Education",            // 19: 6-level education scale
    "Income",               // 20: 8-level income scale
];

/// Total number of features
pub const FEATURE_COUNT: usize = 21;

/// Indices used by the advice rules
pub const BMI_INDEX: usize = 3;
pub const SMOKER_INDEX: usize = 4;
pub const PHYS_ACTIVITY_INDEX: usize = 7;
pub const GEN_HLTH_INDEX: usize = 13;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Artifact column names don't match the trained layout
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("feature layout mismatch at column {index}: expected {expected:?}, got {actual:?}")]
pub struct LayoutMismatchError {
    pub index: usize,
    pub expected: String,
    pub actual: String,
}

/// Check an artifact's declared column names against `FEATURE_LAYOUT`
pub fn validate_names<S: AsRef<str>>(names: &[S]) -> Result<(), LayoutMismatchError> {
    for index in 0..names.len().max(FEATURE_COUNT) {
        let expected = FEATURE_LAYOUT.get(index).copied().unwrap_or("<none>");
        let actual = names.get(index).map(|n| n.as_ref()).unwrap_or("<none>");
        if expected != actual {
            return Err(LayoutMismatchError {
                index,
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    Ok(())
}

/// Vector built against a different layout version or column order
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(
    "feature vector layout mismatch: expected v{expected_version} (hash {expected_hash:08x}), \
     got v{actual_version} (hash {actual_hash:08x})"
)]
pub struct LayoutVersionError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Check a vector's version and hash against the current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutVersionError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutVersionError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE NAME LOOKUP
// ============================================================================

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}
