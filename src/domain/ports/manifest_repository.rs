//! ManifestRepository port - persistence for the build manifest

use std::path::{Path, PathBuf};

use crate::domain::entities::Manifest;

/// Manifest persistence errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    /// The lock marker stayed in place for every attempt
    #[error("manifest {path} is locked (gave up after {attempts} attempts)")]
    Locked { path: PathBuf, attempts: u32 },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("invalid manifest: {0}")]
    ParseError(String),
}

/// Load and save manifests
pub trait ManifestRepository: Send + Sync {
    /// Load a manifest; a missing file yields an empty manifest
    fn load(&self, path: &Path) -> Result<Manifest, ManifestError>;

    /// Load, falling back to an empty manifest on any error
    fn load_or_new(&self, path: &Path) -> Manifest {
        self.load(path).unwrap_or_default()
    }

    /// Persist the full mapping under the cross-process lock
    fn save(&self, manifest: &Manifest, path: &Path) -> Result<(), ManifestError>;
}
