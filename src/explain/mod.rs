//! Explain Module - per-feature attribution for a single record

pub mod engine;
pub mod types;

pub use engine::{load_explainer, rank, ExplainError, Explainer, TOP_K};
pub use types::Attribution;
