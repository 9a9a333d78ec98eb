//! Feature Vector - Core data structure for ML input
//!
//! Values are stored in `FEATURE_LAYOUT` order; the layout hash travels with
//! the vector so a caller can tell which schema produced it.

use serde::{Deserialize, Serialize};

use super::layout::{
    layout_hash, validate_layout, LayoutVersionError, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION,
};

/// Versioned feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values with current version
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutVersionError> {
        validate_layout(self.version, self.layout_hash)
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Value at a layout index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Single-precision copy for tensor runtimes
    pub fn to_f32(&self) -> [f32; FEATURE_COUNT] {
        let mut out = [0.0f32; FEATURE_COUNT];
        for (dst, src) in out.iter_mut().zip(self.values.iter()) {
            *dst = *src as f32;
        }
        out
    }

    /// Named view, used in debug logs
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_LAYOUT.iter().copied().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_carries_layout() {
        let vector = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        assert_eq!(vector.version, FEATURE_VERSION);
        assert_eq!(vector.layout_hash, layout_hash());
    }

    #[test]
    fn test_validate() {
        let mut vector = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        assert!(vector.validate().is_ok());

        vector.layout_hash = vector.layout_hash.wrapping_add(1);
        assert!(vector.validate().is_err());

        let mut vector = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        vector.version = 0;
        assert!(vector.validate().is_err());
    }

    #[test]
    fn test_get_and_f32() {
        let mut values = [0.0; FEATURE_COUNT];
        values[3] = 27.5;
        let vector = FeatureVector::from_values(values);

        assert_eq!(vector.get(3), Some(27.5));
        assert_eq!(vector.get(FEATURE_COUNT), None);
        assert_eq!(vector.to_f32()[3], 27.5f32);
    }

    #[test]
    fn test_named_pairs() {
        let mut values = [0.0; FEATURE_COUNT];
        values[20] = 8.0;
        let vector = FeatureVector::from_values(values);

        let last = vector.named().last().unwrap();
        assert_eq!(last, ("Income", 8.0));
    }
}
