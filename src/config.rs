//! Configuration module
//!
//! Both binaries read their settings from environment variables
//! (after `dotenvy` has loaded an optional `.env` file).

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use validator::Validate;

use crate::model::ForestParams;

const DEFAULT_MODEL_PATH: &str = "model.json";
const DEFAULT_ENCODERS_PATH: &str = "label_encoders.json";

/// Prediction service configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Classifier artifact
    pub model_path: PathBuf,

    /// Category encoders artifact
    pub encoders_path: PathBuf,

    /// Directory uploaded audio files are written to
    pub upload_dir: PathBuf,

    /// Request body cap for uploads
    pub max_upload_bytes: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: env_or("PORT", 5000),
            model_path: env_or("MODEL_PATH", PathBuf::from(DEFAULT_MODEL_PATH)),
            encoders_path: env_or("ENCODERS_PATH", PathBuf::from(DEFAULT_ENCODERS_PATH)),
            upload_dir: env_or("UPLOAD_DIR", PathBuf::from("uploaded_audios")),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 25 * 1024 * 1024),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Training pipeline configuration
#[derive(Debug, Clone, Validate)]
pub struct TrainConfig {
    /// Labeled CSV dataset
    pub dataset_path: PathBuf,

    pub model_path: PathBuf,

    pub encoders_path: PathBuf,

    /// Trees in the forest
    #[validate(range(min = 1))]
    pub n_trees: u16,

    /// Seed for both the train/test split and the forest
    pub seed: u64,

    /// Share of rows held out for evaluation
    #[validate(range(min = 0.0, exclusive_max = 1.0))]
    pub test_ratio: f64,
}

impl TrainConfig {
    pub fn from_env() -> Self {
        let defaults = ForestParams::default();

        Self {
            dataset_path: env_or("DATASET_PATH", PathBuf::from("dataset.csv")),
            model_path: env_or("MODEL_PATH", PathBuf::from(DEFAULT_MODEL_PATH)),
            encoders_path: env_or("ENCODERS_PATH", PathBuf::from(DEFAULT_ENCODERS_PATH)),
            n_trees: env_or("N_TREES", defaults.n_trees),
            seed: env_or("RANDOM_SEED", defaults.seed),
            test_ratio: env_or("TEST_RATIO", 0.2),
        }
    }

    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.n_trees,
            seed: self.seed,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
