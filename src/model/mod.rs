//! Model Module - classifier and persisted artifacts

pub mod classifier;
pub mod artifact;

pub use classifier::{Classifier, ClassifierError, ForestClassifier, ForestParams};
pub use artifact::{
    load_artifact, stage_artifact, EncodersArtifact, ModelArtifact, StagedArtifact,
    StorageError, Stored, Versioned,
};
