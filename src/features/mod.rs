//! Feature Module - schema, category encoders and record encoding
//!
//! Shared by the training pipeline and the prediction service.

pub mod layout;
pub mod encoder;
pub mod record;


pub use layout::{
    FeatureColumn, FeatureKind, FeatureVector, LayoutInfo, LayoutMismatchError,
    CATEGORICAL_COLUMNS, FEATURE_COUNT, FEATURE_LAYOUT, LABEL_COLUMN,
};
pub use encoder::{CategoryEncoder, EncoderError, EncoderSet};
pub use record::{encode_record, parse_flag, FeatureError, FeatureRecord, FeatureValue};
