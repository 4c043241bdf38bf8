//! Prediction handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::models::{PredictionRequest, PredictionResponse};
use crate::{AppResult, AppState};

/// Encode the record, run the forest, decode the activity label
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(request) = payload?;

    let predicted_activity = state.predictor.predict(&request)?;

    tracing::debug!("Predicted activity: {}", predicted_activity);

    Ok(Json(PredictionResponse { predicted_activity }))
}
