//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

use crate::predictor::PredictError;

pub type AppResult<T> = Result<T, AppError>;

/// One offending request field
#[derive(Debug, Clone, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub enum AppError {
    // Request body could not be read as a Feature Record
    InvalidInput(String),

    // Strict mode range violations
    ValidationError(Vec<FieldError>),

    // Classifier or explainer failed
    InferenceError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            AppError::InvalidInput(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid input",
                vec![FieldError {
                    field: "body".to_string(),
                    message: msg.clone(),
                }],
            ),
            AppError::ValidationError(fields) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Invalid input", fields.clone())
            }
            AppError::InferenceError(msg) => {
                tracing::error!("Inference error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", Vec::new())
            }
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16()
        });
        if !details.is_empty() {
            body["details"] = json!(details);
        }

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} out of range", field)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationError(fields)
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        AppError::InferenceError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_input_response() {
        let response = AppError::InvalidInput("missing field `BMI`".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert_eq!(json["status"], 422);
        assert_eq!(json["error"], "Invalid input");
        assert_eq!(json["details"][0]["message"], "missing field `BMI`");
    }

    #[tokio::test]
    async fn test_inference_error_hides_detail() {
        let response = AppError::InferenceError("session poisoned".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Internal server error");
        assert!(json.get("details").is_none());
    }
}
