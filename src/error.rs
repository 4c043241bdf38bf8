//! Error handling

use axum::{
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::predictor::PredictError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Prediction input errors
    MissingField(String),
    UnknownCategory { field: String, value: String },
    InvalidValue { field: String, reason: String },

    // Malformed request
    ValidationError(String),

    // Upload body over the configured cap
    PayloadTooLarge(String),

    // Classifier and encoders disagree
    CorruptState(String),

    // Upload could not be written
    StorageError(String),

    // Generic errors
    InternalError(String),
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::MissingField(_) => "missing_field",
            AppError::UnknownCategory { .. } => "unknown_category",
            AppError::InvalidValue { .. } => "invalid_value",
            AppError::ValidationError(_) => "bad_request",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::CorruptState(_) => "corrupt_state",
            AppError::StorageError(_) => "storage_error",
            AppError::InternalError(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();

        let (status, error_message) = match &self {
            AppError::MissingField(field) => {
                (StatusCode::BAD_REQUEST, format!("Missing required field '{}'", field))
            }
            AppError::UnknownCategory { field, value } => (
                StatusCode::BAD_REQUEST,
                format!("Unknown value '{}' for field '{}'", value, field),
            ),
            AppError::InvalidValue { field, reason } => (
                StatusCode::BAD_REQUEST,
                format!("Invalid value for field '{}': {}", field, reason),
            ),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            AppError::CorruptState(msg) => {
                tracing::error!("Corrupt model state: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::StorageError(msg) => {
                tracing::error!("Storage error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16(),
            "kind": kind,
        });

        match &self {
            AppError::MissingField(field) | AppError::InvalidValue { field, .. } => {
                body["field"] = json!(field);
            }
            AppError::UnknownCategory { field, value } => {
                body["field"] = json!(field);
                body["value"] = json!(value);
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        tracing::debug!("Prediction rejected: {}", err);
        match err {
            PredictError::MissingField(field) => AppError::MissingField(field),
            PredictError::UnknownCategory { field, value } => AppError::UnknownCategory { field, value },
            PredictError::InvalidValue { field, reason } => AppError::InvalidValue { field, reason },
            PredictError::CorruptState(msg) => AppError::CorruptState(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(err.body_text()),
            status if status.is_server_error() => AppError::InternalError(err.body_text()),
            _ => AppError::ValidationError(err.body_text()),
        }
    }
}
