//! Activity Prediction API server
//!
//! Loads the trained classifier and encoders once, then serves
//! `/predict` and `/upload-audio` until interrupted.

use anyhow::Context;

use activity_predictor::{create_router, logging, AppState, PredictionService, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();

    // Initialize logging
    logging::init(if config.is_production() {
        "activity_predictor=info,tower_http=info"
    } else {
        "activity_predictor=debug,tower_http=debug"
    });

    tracing::info!("Activity Prediction API starting ({})...", config.environment);

    // Without both artifacts there is nothing to serve
    let predictor = match PredictionService::load(&config.model_path, &config.encoders_path) {
        Ok(predictor) => predictor,
        Err(e) => {
            tracing::error!("Model artifacts unavailable: {}", e);
            return Err(e).context("failed to load model artifacts");
        }
    };

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("failed to create {}", config.upload_dir.display()))?;

    let addr = config.bind_addr();
    let app = create_router(AppState::new(predictor, config));

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
