//! Prediction Service - encode → predict → decode
//!
//! [`PredictionService`] is built once at startup from the two artifacts and
//! shared read-only by every request.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::features::{
    encode_record, EncoderError, EncoderSet, FeatureError, FeatureRecord, LayoutInfo,
    LABEL_COLUMN,
};
use crate::model::{
    load_artifact, Classifier, EncodersArtifact, ForestParams, ModelArtifact, StorageError,
    Stored,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("unknown category '{value}' for field '{field}'")]
    UnknownCategory { field: String, value: String },

    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("corrupt model state: {0}")]
    CorruptState(String),
}

impl From<FeatureError> for PredictError {
    fn from(err: FeatureError) -> Self {
        match err {
            FeatureError::MissingField(field) => PredictError::MissingField(field),
            FeatureError::UnknownCategory { field, value } => {
                PredictError::UnknownCategory { field, value }
            }
            FeatureError::InvalidValue { field, reason } => {
                PredictError::InvalidValue { field, reason }
            }
            FeatureError::Encoder(e) => PredictError::CorruptState(e.to_string()),
        }
    }
}

/// Descriptive metadata about the loaded model
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub classes: Vec<String>,
    pub n_trees: Option<u16>,
    pub seed: Option<u64>,
    pub trained_at: Option<DateTime<Utc>>,
    pub layout_version: u8,
    pub layout_hash: u32,
    /// SHA-256 of the classifier artifact
    pub digest: Option<String>,
}

/// Immutable prediction context: classifier + encoders
pub struct PredictionService {
    classifier: Box<dyn Classifier>,
    encoders: EncoderSet,
    info: ModelInfo,
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("encoders", &self.encoders)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl PredictionService {
    /// Build from an arbitrary classifier and a complete encoder set
    pub fn new(classifier: Box<dyn Classifier>, encoders: EncoderSet) -> Result<Self, EncoderError> {
        encoders.ensure_complete()?;

        let layout = LayoutInfo::current();
        let info = ModelInfo {
            classes: encoders.get(LABEL_COLUMN)?.classes().to_vec(),
            n_trees: None,
            seed: None,
            trained_at: None,
            layout_version: layout.version,
            layout_hash: layout.hash,
            digest: None,
        };

        Ok(Self {
            classifier,
            encoders,
            info,
        })
    }

    /// Load both artifacts from disk. Any failure here is fatal for the service.
    pub fn load(model_path: &Path, encoders_path: &Path) -> Result<Self, StorageError> {
        let Stored { artifact: model, digest } = load_artifact::<ModelArtifact>(model_path)?;
        let Stored { artifact: encoders, .. } = load_artifact::<EncodersArtifact>(encoders_path)?;

        let ModelArtifact {
            trained_at,
            params: ForestParams { n_trees, seed },
            classifier,
            ..
        } = model;

        let mut service = Self::new(Box::new(classifier), encoders.encoders)?;
        service.info.n_trees = Some(n_trees);
        service.info.seed = Some(seed);
        service.info.trained_at = Some(trained_at);
        service.info.digest = Some(digest);

        tracing::info!(
            classes = service.info.classes.len(),
            n_trees,
            trained_at = %trained_at,
            "Prediction model loaded"
        );

        Ok(service)
    }

    /// Predict the activity label of one record
    pub fn predict<R: FeatureRecord + ?Sized>(&self, record: &R) -> Result<String, PredictError> {
        let features = encode_record(record, &self.encoders)?;

        let code = self
            .classifier
            .predict(&features)
            .map_err(|e| PredictError::CorruptState(e.to_string()))?;

        self.encoders
            .decode(LABEL_COLUMN, code)
            .map(str::to_string)
            .map_err(|e| PredictError::CorruptState(e.to_string()))
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }
}
