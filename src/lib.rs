//! Activity Prediction Service
//!
//! Offline training pipeline and HTTP inference service for activity
//! classification from phone sensor/context readings.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐        ┌───────────────────────────────┐
//! │  train (binary)      │        │  activity-predictor (binary)  │
//! │  CSV → encoders      │        │  ┌─────────┐  ┌────────────┐  │
//! │      → forest        │        │  │  Axum   │→ │ Prediction │  │
//! └─────────┬────────────┘        │  │ routes  │  │  Service   │  │
//!           │                     │  └─────────┘  └─────┬──────┘  │
//!           ▼                     └──────────────────────┼────────┘
//!   model.json + label_encoders.json  ───────────────────┘ (loaded once)
//! ```
//!
//! Both sides share [`features::layout::FEATURE_LAYOUT`] as the only
//! definition of the feature vector.

pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod handlers;
pub mod logging;
pub mod model;
pub mod models;
pub mod predictor;
pub mod training;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::{ServerConfig, TrainConfig};
pub use error::{AppError, AppResult};
pub use predictor::{PredictError, PredictionService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<PredictionService>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(predictor: PredictionService, config: ServerConfig) -> Self {
        Self {
            predictor: Arc::new(predictor),
            config,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/", get(handlers::health::home))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route(
            "/upload-audio",
            post(handlers::upload::upload_audio).layer(upload_limit),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
