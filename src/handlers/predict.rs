//! Prediction handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use validator::Validate;

use crate::features::FeatureRecord;
use crate::models::PredictResponse;
use crate::{AppResult, AppState};

/// Score one survey record
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<FeatureRecord>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(record) = payload.map_err(|rejection| {
        tracing::debug!("Rejected prediction request: {}", rejection.body_text());
        rejection
    })?;

    if state.config.strict_validation {
        record.validate()?;
    }

    let response = state.predictor.predict(&record)?;

    Ok(Json(response))
}
