use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::features::layout::{required_dataset_columns, EXCLUDED_COLUMNS};
use super::record::DatasetRecord;
use super::DatasetError;

/// Load a CSV dataset from disk
pub fn load_dataset(path: &Path) -> Result<Vec<DatasetRecord>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let records = read_dataset(file)?;

    tracing::info!("Loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}

/// Parse CSV rows, checking the header for required columns first
pub fn read_dataset<R: Read>(input: R) -> Result<Vec<DatasetRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    for column in required_dataset_columns() {
        if !headers.iter().any(|h| h == column) {
            return Err(DatasetError::MissingColumn(column.to_string()));
        }
    }

    let absent: Vec<_> = EXCLUDED_COLUMNS
        .iter()
        .filter(|&&column| !headers.iter().any(|h| h == column))
        .collect();
    if !absent.is_empty() {
        tracing::debug!("Optional columns absent from dataset: {:?}", absent);
    }

    let records = reader
        .deserialize::<DatasetRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    if records.is_empty() {
        return Err(DatasetError::Empty);
    }

    Ok(records)
}
