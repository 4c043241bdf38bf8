//! Dataset Module - labeled training data
//!
//! Reads the tabular sensor dataset (CSV with header) used by the
//! training pipeline.

pub mod record;
pub mod reader;


use std::path::PathBuf;

use thiserror::Error;

pub use reader::{load_dataset, read_dataset};
pub use record::DatasetRecord;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("dataset has no rows")]
    Empty,

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),
}
