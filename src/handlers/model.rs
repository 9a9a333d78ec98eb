//! Loaded model description

use axum::{extract::State, Json};

use crate::predictor::PredictorInfo;
use crate::AppState;

/// Classifier metadata, advice mode, label policy and feature layout
pub async fn info(State(state): State<AppState>) -> Json<PredictorInfo> {
    Json(state.predictor.info())
}
