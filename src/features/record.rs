//! Record → Feature Vector encoding
//!
//! Training rows and prediction requests both go through [`encode_record`],
//! so the column order in [`FEATURE_LAYOUT`] is applied in one place only.

use thiserror::Error;

use super::encoder::{EncoderError, EncoderSet};
use super::layout::{FeatureKind, FeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};

/// A raw field value, before encoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Number(f64),
    Bool(bool),
    Text(&'a str),
}

impl FeatureValue<'_> {
    fn as_number(&self) -> Option<f64> {
        let n = match self {
            FeatureValue::Number(n) => *n,
            FeatureValue::Text(s) => s.trim().parse().ok()?,
            FeatureValue::Bool(_) => return None,
        };
        n.is_finite().then_some(n)
    }

    fn as_flag(&self) -> Option<bool> {
        match self {
            FeatureValue::Bool(b) => Some(*b),
            FeatureValue::Number(n) if *n == 1.0 => Some(true),
            FeatureValue::Number(n) if *n == 0.0 => Some(false),
            FeatureValue::Number(_) => None,
            FeatureValue::Text(s) => parse_flag(s),
        }
    }

    fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(*s),
            _ => None,
        }
    }
}

/// Anything that can supply named feature values
pub trait FeatureRecord {
    /// Value of the named column, `None` when absent
    fn feature(&self, name: &str) -> Option<FeatureValue<'_>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("unknown category '{value}' for field '{field}'")]
    UnknownCategory { field: String, value: String },

    #[error(transparent)]
    Encoder(EncoderError),
}

impl From<EncoderError> for FeatureError {
    fn from(err: EncoderError) -> Self {
        match err {
            EncoderError::UnknownCategory { column, value } => {
                FeatureError::UnknownCategory { field: column, value }
            }
            other => FeatureError::Encoder(other),
        }
    }
}

/// Parse boolean-like text: 1/0, true/false, yes/no (any case)
pub fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "t" | "yes" | "y" => Some(true),
        "0" | "0.0" | "false" | "f" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Check that every layout column is present, reporting the first absent one
pub fn check_presence<R: FeatureRecord + ?Sized>(record: &R) -> Result<(), FeatureError> {
    match FEATURE_LAYOUT.iter().find(|c| record.feature(c.name).is_none()) {
        Some(column) => Err(FeatureError::MissingField(column.name.to_string())),
        None => Ok(()),
    }
}

/// Encode one record into the layout-ordered feature vector
pub fn encode_record<R: FeatureRecord + ?Sized>(
    record: &R,
    encoders: &EncoderSet,
) -> Result<FeatureVector, FeatureError> {
    check_presence(record)?;

    let mut vector = [0.0; FEATURE_COUNT];

    for (slot, column) in vector.iter_mut().zip(FEATURE_LAYOUT) {
        let value = record
            .feature(column.name)
            .ok_or_else(|| FeatureError::MissingField(column.name.to_string()))?;

        let invalid = |reason: &str| FeatureError::InvalidValue {
            field: column.name.to_string(),
            reason: reason.to_string(),
        };

        *slot = match column.kind {
            FeatureKind::Numeric => value.as_number().ok_or_else(|| invalid("expected a finite number"))?,
            FeatureKind::Flag => {
                let flag = value.as_flag().ok_or_else(|| invalid("expected 0 or 1"))?;
                if flag { 1.0 } else { 0.0 }
            }
            FeatureKind::Categorical => {
                let text = value.as_category().ok_or_else(|| invalid("expected a string"))?;
                encoders.encode(column.name, text)? as f64
            }
        };
    }

    Ok(vector)
}
