//! Category Encoders
//!
//! Bijective mapping between the distinct string values a column took at
//! training time and dense codes `0..k-1`. Codes follow the sorted order of
//! the vocabulary, so an encoder is fully described by its sorted class list.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::layout::CATEGORICAL_COLUMNS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncoderError {
    #[error("unknown category '{value}' for column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("code {code} has no category in column '{column}' ({classes} classes)")]
    UnknownCode { column: String, code: u32, classes: usize },

    #[error("classes of column '{column}' are not sorted and unique")]
    Unsorted { column: String },

    #[error("no encoder for column '{0}'")]
    MissingEncoder(String),
}

/// Encoder for a single categorical column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEncoder {
    column: String,
    classes: Vec<String>,
}

impl CategoryEncoder {
    /// Fit over the distinct values of a column
    pub fn fit<I, S>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect();

        Self {
            column: column.to_string(),
            classes: distinct.into_iter().collect(),
        }
    }

    /// Rebuild from a persisted class list
    pub fn from_classes(column: &str, classes: Vec<String>) -> Result<Self, EncoderError> {
        if classes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(EncoderError::Unsorted { column: column.to_string() });
        }

        Ok(Self {
            column: column.to_string(),
            classes,
        })
    }

    pub fn encode(&self, value: &str) -> Result<u32, EncoderError> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .map(|index| index as u32)
            .map_err(|_| EncoderError::UnknownCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }

    pub fn decode(&self, code: u32) -> Result<&str, EncoderError> {
        self.classes
            .get(code as usize)
            .map(String::as_str)
            .ok_or_else(|| EncoderError::UnknownCode {
                column: self.column.clone(),
                code,
                classes: self.classes.len(),
            })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// One encoder per categorical column, keyed by column name.
///
/// Persisted as `{ "column": ["class", ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct EncoderSet {
    encoders: BTreeMap<String, CategoryEncoder>,
}

impl EncoderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, encoder: CategoryEncoder) {
        self.encoders.insert(encoder.column.clone(), encoder);
    }

    pub fn get(&self, column: &str) -> Result<&CategoryEncoder, EncoderError> {
        self.encoders
            .get(column)
            .ok_or_else(|| EncoderError::MissingEncoder(column.to_string()))
    }

    pub fn encode(&self, column: &str, value: &str) -> Result<u32, EncoderError> {
        self.get(column)?.encode(value)
    }

    pub fn decode(&self, column: &str, code: u32) -> Result<&str, EncoderError> {
        self.get(column)?.decode(code)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }

    /// Every categorical column of the layout must have an encoder
    pub fn ensure_complete(&self) -> Result<(), EncoderError> {
        for column in CATEGORICAL_COLUMNS {
            self.get(column)?;
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for EncoderSet {
    type Error = EncoderError;

    fn try_from(raw: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        let mut set = EncoderSet::new();
        for (column, classes) in raw {
            set.insert(CategoryEncoder::from_classes(&column, classes)?);
        }
        Ok(set)
    }
}

impl From<EncoderSet> for BTreeMap<String, Vec<String>> {
    fn from(set: EncoderSet) -> Self {
        set.encoders
            .into_iter()
            .map(|(column, encoder)| (column, encoder.classes))
            .collect()
    }
}
