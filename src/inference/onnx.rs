//! ONNX Runtime classifier
//!
//! Expects a scikit-learn style export (skl2onnx with `zipmap=False`):
//! - input: float tensor `[N, 21]`
//! - output 0: int64 label tensor `[N]`
//! - output 1: float probability tensor `[N, 2]`

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::{Classification, Classifier, ModelError, ModelMetadata};
use crate::features::{FeatureVector, FEATURE_COUNT};

pub const MODEL_TYPE: &str = "onnx";

pub struct OnnxClassifier {
    // `Session::run` needs exclusive access
    session: Mutex<Session>,
    label_output: String,
    probability_output: String,
    metadata: ModelMetadata,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        tracing::info!("Loading ONNX model from: {}", path.display());

        if !path.exists() {
            return Err(ModelError::Io {
                path: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "model not found"),
            });
        }

        let session = Session::builder()
            .map_err(|e| ModelError::Runtime(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::Runtime(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| ModelError::Runtime(format!("Failed to load model: {}", e)))?;

        let outputs: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        if outputs.len() < 2 {
            return Err(ModelError::Shape {
                what: "model outputs",
                expected: 2,
                actual: outputs.len(),
            });
        }

        tracing::info!("ONNX model loaded (outputs: {:?})", outputs);

        Ok(Self {
            session: Mutex::new(session),
            label_output: outputs[0].clone(),
            probability_output: outputs[1].clone(),
            metadata: ModelMetadata::new(&path.display().to_string(), MODEL_TYPE),
        })
    }

    fn run(&self, input: &FeatureVector) -> Result<Classification, ModelError> {
        input.validate()?;

        let array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input.to_f32().to_vec())
            .map_err(|e| ModelError::Runtime(format!("Array error: {}", e)))?;
        let tensor = Value::from_array(array)
            .map_err(|e| ModelError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| ModelError::Runtime(format!("Inference failed: {}", e)))?;

        let label = outputs
            .get(&self.label_output)
            .ok_or_else(|| ModelError::Runtime("No label output".to_string()))?
            .try_extract_tensor::<i64>()
            .map_err(|e| ModelError::Runtime(format!("Extract error: {}", e)))?
            .1
            .first()
            .copied()
            .ok_or_else(|| ModelError::Runtime("Empty label output".to_string()))?;

        let probabilities = outputs
            .get(&self.probability_output)
            .ok_or_else(|| ModelError::Runtime("No probability output".to_string()))?
            .try_extract_tensor::<f32>()
            .map_err(|e| ModelError::Runtime(format!("Extract error: {}", e)))?
            .1;

        // Row 0, column 1 = positive class
        let probability = probabilities
            .get(1)
            .copied()
            .ok_or_else(|| ModelError::Shape {
                what: "class probabilities",
                expected: 2,
                actual: probabilities.len(),
            })?;

        Ok(Classification {
            label: u8::from(label == 1),
            probability: probability as f64,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict_proba(&self, input: &FeatureVector) -> Result<f64, ModelError> {
        self.run(input).map(|out| out.probability)
    }

    fn predict(&self, input: &FeatureVector) -> Result<u8, ModelError> {
        self.run(input).map(|out| out.label)
    }

    /// One session run for both outputs
    fn classify(&self, input: &FeatureVector) -> Result<Classification, ModelError> {
        self.run(input)
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
