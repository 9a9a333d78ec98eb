use serde::{Deserialize, Serialize};

/// Signed contribution of one feature to one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub name: String,
    pub index: usize,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainResult {
    /// Highest |score| first
    pub contributions: Vec<Attribution>,
}
