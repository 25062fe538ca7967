//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use model_service::ModelError;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Request errors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Model errors
    #[error("prediction failed: {0}")]
    Prediction(#[from] ModelError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidInput(detail) => {
                tracing::debug!("Rejected request: {}", detail);
                (StatusCode::BAD_REQUEST, "Invalid input")
            }
            AppError::Prediction(err) => {
                tracing::error!("Prediction error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
