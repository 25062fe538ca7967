//! Assignee prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub assigned_developer: String,
}

/// Predict the developer for a bug report.
///
/// A missing, malformed, non-object or empty JSON body is rejected with 400.
pub async fn predict_assignee(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    if body.as_object().map_or(true, |fields| fields.is_empty()) {
        return Err(AppError::InvalidInput("expected a non-empty JSON object".to_string()));
    }

    let req: PredictRequest = serde_json::from_value(body)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let assigned_developer = state.predictor.predict(&req.description, &req.category)?;

    tracing::info!("Assigned {:?} (category {:?})", assigned_developer, req.category);

    Ok(Json(PredictResponse { assigned_developer }))
}
