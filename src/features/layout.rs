//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema shared by training and serving.**
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! Artifacts written by the training pipeline embed the version and hash
//! below; the prediction service refuses to load artifacts whose layout
//! differs from the one compiled in.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// How a raw column value becomes a number in the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Passed through as f64
    Numeric,
    /// Looked up in the column's category encoder
    Categorical,
    /// Boolean stored as 0/1
    Flag,
}

impl FeatureKind {
    fn tag(self) -> u8 {
        match self {
            FeatureKind::Numeric => 0,
            FeatureKind::Categorical => 1,
            FeatureKind::Flag => 2,
        }
    }
}

/// One column of the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureColumn {
    pub name: &'static str,
    pub kind: FeatureKind,
}

const fn column(name: &'static str, kind: FeatureKind) -> FeatureColumn {
    FeatureColumn { name, kind }
}

/// Feature columns in the exact order they appear in the vector.
/// This is the SINGLE SOURCE OF TRUTH for feature layout.
pub const FEATURE_LAYOUT: &[FeatureColumn] = &[
    column("heartbeat", FeatureKind::Numeric),                // 0
    column("position", FeatureKind::Categorical),             // 1
    column("time_of_day", FeatureKind::Categorical),          // 2
    column("phone_status", FeatureKind::Categorical),         // 3
    column("surrounding_noise_level", FeatureKind::Numeric),  // 4
    column("companion_presence", FeatureKind::Flag),          // 5
    column("is_in_safe_zone", FeatureKind::Flag),             // 6
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 7;

/// Target column predicted by the classifier
pub const LABEL_COLUMN: &str = "activity";

/// Columns that get a category encoder, label included
pub const CATEGORICAL_COLUMNS: &[&str] = &["position", LABEL_COLUMN, "time_of_day", "phone_status"];

/// Dataset columns that are read but never fed to the classifier
pub const EXCLUDED_COLUMNS: &[&str] = &["location", "panic_button_pressed", "alert_triggered"];

/// Ordered numeric feature vector
pub type FeatureVector = [f64; FEATURE_COUNT];

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches between artifacts and the running binary
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for column in FEATURE_LAYOUT {
        hasher.update(column.name.as_bytes());
        hasher.update(&[column.kind.tag()]);
        hasher.update(&[0]); // Separator
    }

    hasher.update(LABEL_COLUMN.as_bytes());

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout information embedded in persisted artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_names: Vec<String>,
    pub label: String,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: compute_layout_hash(),
            feature_names: FEATURE_LAYOUT.iter().map(|c| c.name.to_string()).collect(),
            label: LABEL_COLUMN.to_string(),
        }
    }

    /// Check this (deserialized) layout against the compiled-in one
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.hash)
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
     got v{actual_version} (hash: {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = compute_layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// DATASET COLUMNS
// ============================================================================

/// Every column the training dataset must provide
pub fn required_dataset_columns() -> impl Iterator<Item = &'static str> {
    FEATURE_LAYOUT
        .iter()
        .map(|c| c.name)
        .chain(std::iter::once(LABEL_COLUMN))
}

// ============================================================================
// TESTS
// ============================================================================
