//! Training pipeline
//!
//! Usage: `train [DATASET_PATH]` (defaults to `$DATASET_PATH` or `dataset.csv`).
//! Writes the classifier to `$MODEL_PATH` and the encoders to `$ENCODERS_PATH`.

use anyhow::Context;

use activity_predictor::{logging, training, TrainConfig};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init("activity_predictor=info,train=info");

    let mut config = TrainConfig::from_env();
    if let Some(path) = std::env::args_os().nth(1) {
        config.dataset_path = path.into();
    }

    tracing::info!("Training on {}", config.dataset_path.display());

    let report = match training::run(&config) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Training failed: {}", e);
            return Err(e).context("training failed");
        }
    };

    tracing::info!(
        rows = report.rows,
        classes = report.classes.len(),
        "Training complete"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
