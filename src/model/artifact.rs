//! Artifact storage - persisted classifier and encoders
//!
//! Both artifacts are JSON documents carrying the feature layout they were
//! produced with. Loading rejects artifacts from a different layout.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::features::{EncoderError, EncoderSet, LayoutInfo, LayoutMismatchError};
use super::classifier::{ForestClassifier, ForestParams};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("incompatible artifact {}: {source}", path.display())]
    LayoutMismatch {
        path: PathBuf,
        #[source]
        source: LayoutMismatchError,
    },

    #[error("inconsistent encoders: {0}")]
    Encoders(#[from] EncoderError),
}

/// Artifacts that record the feature layout they were built against
pub trait Versioned {
    fn layout(&self) -> &LayoutInfo;
}

/// Persisted classifier
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub layout: LayoutInfo,
    pub trained_at: DateTime<Utc>,
    pub params: ForestParams,
    pub classifier: ForestClassifier,
}

impl ModelArtifact {
    pub fn new(classifier: ForestClassifier, params: ForestParams) -> Self {
        Self {
            layout: LayoutInfo::current(),
            trained_at: Utc::now(),
            params,
            classifier,
        }
    }
}

impl Versioned for ModelArtifact {
    fn layout(&self) -> &LayoutInfo {
        &self.layout
    }
}

/// Persisted category encoders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodersArtifact {
    pub layout: LayoutInfo,
    pub encoders: EncoderSet,
}

impl EncodersArtifact {
    pub fn new(encoders: EncoderSet) -> Self {
        Self {
            layout: LayoutInfo::current(),
            encoders,
        }
    }
}

impl Versioned for EncodersArtifact {
    fn layout(&self) -> &LayoutInfo {
        &self.layout
    }
}

/// A loaded artifact plus the SHA-256 of its bytes
#[derive(Debug)]
pub struct Stored<T> {
    pub artifact: T,
    pub digest: String,
}

/// An artifact serialized to a sibling temp file, not yet moved into place
#[derive(Debug)]
pub struct StagedArtifact {
    tmp: PathBuf,
    path: PathBuf,
}

impl StagedArtifact {
    /// Rename the temp file over the destination
    pub fn commit(self) -> Result<(), StorageError> {
        if let Err(source) = fs::rename(&self.tmp, &self.path) {
            let _ = fs::remove_file(&self.tmp);
            return Err(StorageError::Io { path: self.path, source });
        }

        tracing::debug!("Artifact written: {}", self.path.display());
        Ok(())
    }

    /// Drop the temp file, leaving the destination untouched
    pub fn discard(self) {
        let _ = fs::remove_file(&self.tmp);
    }
}

/// Serialize and write an artifact next to `path` without replacing it
pub fn stage_artifact<T: Serialize>(artifact: &T, path: &Path) -> Result<StagedArtifact, StorageError> {
    let io_err = |source| StorageError::Io { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_vec(artifact).map_err(|source| StorageError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json).map_err(io_err)?;

    Ok(StagedArtifact {
        tmp,
        path: path.to_path_buf(),
    })
}

/// Load artifact from disk with layout validation
pub fn load_artifact<T>(path: &Path) -> Result<Stored<T>, StorageError>
where
    T: DeserializeOwned + Versioned,
{
    if !path.exists() {
        return Err(StorageError::NotFound(path.to_path_buf()));
    }

    let data = fs::read(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let artifact: T = serde_json::from_slice(&data).map_err(|source| StorageError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    artifact.layout().validate().map_err(|source| StorageError::LayoutMismatch {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Stored {
        artifact,
        digest: format!("{:x}", Sha256::digest(&data)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::CategoryEncoder;

    fn encoders() -> EncoderSet {
        let mut set = EncoderSet::new();
        set.insert(CategoryEncoder::fit("position", ["pocket", "hand", "bag"]));
        set
    }

    #[test]
    fn test_save_load_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("label_encoders.json");

        stage_artifact(&EncodersArtifact::new(encoders()), &path).unwrap().commit().unwrap();
        let stored: Stored<EncodersArtifact> = load_artifact(&path).unwrap();

        assert_eq!(stored.artifact.encoders, encoders());
        assert_eq!(stored.digest.len(), 64);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_discarded_stage_leaves_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label_encoders.json");

        let staged = stage_artifact(&EncodersArtifact::new(encoders()), &path).unwrap();
        assert!(path.with_extension("tmp").exists());
        assert!(!path.exists());

        staged.discard();
        assert!(!path.with_extension("tmp").exists());
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_commit_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label_encoders");
        fs::create_dir(&path).unwrap();

        let staged = stage_artifact(&EncodersArtifact::new(encoders()), &path).unwrap();
        assert!(matches!(staged.commit(), Err(StorageError::Io { .. })));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_artifact::<EncodersArtifact>(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_load_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label_encoders.json");
        fs::write(&path, b"not json").unwrap();

        let result = load_artifact::<EncodersArtifact>(&path);
        assert!(matches!(result, Err(StorageError::Format { .. })));
    }

    #[test]
    fn test_reject_layout_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label_encoders.json");

        let mut artifact = EncodersArtifact::new(encoders());
        artifact.layout.hash = !artifact.layout.hash;
        stage_artifact(&artifact, &path).unwrap().commit().unwrap();

        match load_artifact::<EncodersArtifact>(&path) {
            Err(StorageError::LayoutMismatch { source, .. }) => {
                assert_eq!(source.expected_hash, LayoutInfo::current().hash);
            }
            other => panic!("Expected LayoutMismatch, got {:?}", other.map(|s| s.digest)),
        }
    }
}
