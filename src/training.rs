//! Training Pipeline
//!
//! dataset → category encoders → encoded feature vectors → seeded 80/20
//! split → random forest → persisted artifacts.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use validator::Validate;

use crate::config::TrainConfig;
use crate::dataset::{self, DatasetError, DatasetRecord};
use crate::features::{
    encode_record, CategoryEncoder, EncoderSet, FeatureError, FeatureRecord, FeatureValue,
    FeatureVector, CATEGORICAL_COLUMNS, LABEL_COLUMN,
};
use crate::model::{
    stage_artifact, ClassifierError, EncodersArtifact, ForestClassifier, ForestParams,
    ModelArtifact, StorageError,
};

#[derive(Debug, Error)]
pub enum TrainError {
    #[error("invalid training configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("row {row}: {source}")]
    Encoding {
        row: usize,
        #[source]
        source: FeatureError,
    },

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Summary of a training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Accuracy on the held-out split, `None` when nothing was held out
    pub holdout_accuracy: Option<f64>,
    pub classes: Vec<String>,
}

/// Result of fitting, before persistence
#[derive(Debug)]
pub struct TrainedModel {
    pub classifier: ForestClassifier,
    pub encoders: EncoderSet,
    pub params: ForestParams,
    pub report: TrainingReport,
}

/// Run the full pipeline described by `config` and persist both artifacts
pub fn run(config: &TrainConfig) -> Result<TrainingReport, TrainError> {
    config.validate()?;

    let records = dataset::load_dataset(&config.dataset_path)?;
    let trained = train(&records, config.forest_params(), config.test_ratio)?;

    // Both files are written before either replaces a previous run's artifact
    let model = stage_artifact(&ModelArtifact::new(trained.classifier, trained.params), &config.model_path)?;
    let encoders = match stage_artifact(&EncodersArtifact::new(trained.encoders), &config.encoders_path) {
        Ok(staged) => staged,
        Err(e) => {
            model.discard();
            return Err(e.into());
        }
    };

    if let Err(e) = encoders.commit() {
        model.discard();
        return Err(e.into());
    }
    model.commit()?;

    tracing::info!(
        model = %config.model_path.display(),
        encoders = %config.encoders_path.display(),
        "Model and label encoders saved"
    );

    Ok(trained.report)
}

/// Fit encoders and a forest on in-memory records
pub fn train(
    records: &[DatasetRecord],
    params: ForestParams,
    test_ratio: f64,
) -> Result<TrainedModel, TrainError> {
    if records.is_empty() {
        return Err(DatasetError::Empty.into());
    }

    let encoders = fit_encoders(records);
    tracing::debug!(columns = ?encoders.columns().collect::<Vec<_>>(), "Category encoders fitted");

    let mut rows: Vec<FeatureVector> = Vec::with_capacity(records.len());
    let mut labels: Vec<u32> = Vec::with_capacity(records.len());

    for (row, record) in records.iter().enumerate() {
        let encoding = |source| TrainError::Encoding { row, source };

        rows.push(encode_record(record, &encoders).map_err(encoding)?);
        labels.push(
            encoders
                .encode(LABEL_COLUMN, &record.activity)
                .map_err(|e| encoding(e.into()))?,
        );
    }

    let (test_idx, train_idx) = split_indices(records.len(), test_ratio, params.seed);

    let pick = |idx: &[usize]| -> (Vec<FeatureVector>, Vec<u32>) {
        idx.iter().map(|&i| (rows[i], labels[i])).unzip()
    };
    let (train_rows, train_labels) = pick(&train_idx);
    let (test_rows, test_labels) = pick(&test_idx);

    tracing::info!(
        train = train_rows.len(),
        test = test_rows.len(),
        n_trees = params.n_trees,
        seed = params.seed,
        "Fitting random forest"
    );

    let classifier = ForestClassifier::fit(&train_rows, &train_labels, params)?;

    let holdout_accuracy = if test_rows.is_empty() {
        None
    } else {
        let predicted = classifier.predict_batch(&test_rows)?;
        Some(accuracy(&test_labels, &predicted))
    };

    if let Some(acc) = holdout_accuracy {
        tracing::info!("Held-out accuracy: {:.3}", acc);
    }

    let classes = encoders.get(LABEL_COLUMN).map(|e| e.classes().to_vec()).unwrap_or_default();

    let report = TrainingReport {
        rows: records.len(),
        train_rows: train_rows.len(),
        test_rows: test_rows.len(),
        holdout_accuracy,
        classes,
    };

    Ok(TrainedModel {
        classifier,
        encoders,
        params,
        report,
    })
}

/// Fit one encoder per categorical column over the whole dataset
pub fn fit_encoders(records: &[DatasetRecord]) -> EncoderSet {
    let mut set = EncoderSet::new();

    for &column in CATEGORICAL_COLUMNS {
        let values = records.iter().filter_map(|r| category_value(r, column));
        set.insert(CategoryEncoder::fit(column, values));
    }

    set
}

fn category_value<'a>(record: &'a DatasetRecord, column: &str) -> Option<&'a str> {
    if column == LABEL_COLUMN {
        return Some(&record.activity);
    }
    match record.feature(column)? {
        FeatureValue::Text(text) => Some(text),
        _ => None,
    }
}

/// Seeded shuffle split → (test indices, train indices).
///
/// The test share is rounded up but always leaves at least one training row.
pub fn split_indices(n: usize, test_ratio: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_len = (n as f64 * test_ratio).ceil() as usize;
    let test_len = test_len.min(n.saturating_sub(1));

    let train = indices.split_off(test_len);
    (indices, train)
}

fn accuracy(expected: &[u32], predicted: &[u32]) -> f64 {
    if expected.is_empty() {
        return 0.0;
    }
    let correct = expected.iter().zip(predicted).filter(|(a, b)| a == b).count();
    correct as f64 / expected.len() as f64
}
