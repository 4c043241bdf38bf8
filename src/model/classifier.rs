//! Classifier - random forest over encoded feature vectors
//!
//! Fitting and inference are delegated to smartcore; this module only
//! converts between feature vectors and its dense matrix type.

use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use thiserror::Error;

use crate::features::FeatureVector;

type Forest = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,

    #[error("{rows} rows but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("fit failed: {0}")]
    Fit(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Inference seam used by the prediction service
pub trait Classifier: Send + Sync {
    /// Predict the integer-coded label of one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<u32, ClassifierError>;
}

/// Forest hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: u16,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self { n_trees: 100, seed: 42 }
    }
}

/// Random forest classifier fit on layout-ordered feature vectors
#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForestClassifier {
    forest: Forest,
}

impl ForestClassifier {
    pub fn fit(
        rows: &[FeatureVector],
        labels: &[u32],
        params: ForestParams,
    ) -> Result<Self, ClassifierError> {
        if rows.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if rows.len() != labels.len() {
            return Err(ClassifierError::LengthMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }

        let x = to_matrix(rows);
        let y = labels.to_vec();

        let parameters = RandomForestClassifierParameters::default()
            .with_n_trees(params.n_trees)
            .with_seed(params.seed);

        let forest = RandomForestClassifier::fit(&x, &y, parameters)
            .map_err(|e| ClassifierError::Fit(e.to_string()))?;

        Ok(Self { forest })
    }

    /// Predict a batch of rows
    pub fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<u32>, ClassifierError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        self.forest
            .predict(&to_matrix(rows))
            .map_err(|e| ClassifierError::Inference(e.to_string()))
    }
}

impl Classifier for ForestClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<u32, ClassifierError> {
        self.predict_batch(std::slice::from_ref(features))?
            .first()
            .copied()
            .ok_or_else(|| ClassifierError::Inference("empty prediction".to_string()))
    }
}

fn to_matrix(rows: &[FeatureVector]) -> DenseMatrix<f64> {
    let values: Vec<Vec<f64>> = rows.iter().map(|row| row.to_vec()).collect();
    DenseMatrix::from_2d_vec(&values)
}
