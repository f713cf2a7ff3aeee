//! JSON Manifest Repository
//!
//! Implements the ManifestRepository port as a key-sorted JSON object with
//! 2-space indentation.
//!
//! Writers coordinate through a sibling `<manifest>.lock` marker created with
//! `create_new`: whoever creates it owns the manifest until the marker is
//! removed. The marker is removed on every exit path by a drop guard. While
//! another writer holds it, `save` waits a fixed delay and tries again, up to
//! a bounded number of attempts.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::domain::entities::Manifest;
use crate::domain::ports::{
    ManifestError, ManifestRepository, NoopEventSink, SyncEvent, SyncEventSink,
};
use crate::infrastructure::fs::LocalFs;

/// Lock acquisition policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockRetry {
    /// Total attempts before giving up
    pub attempts: u32,
    /// Fixed wait between attempts
    pub delay: Duration,
}

impl Default for LockRetry {
    fn default() -> Self {
        Self {
            attempts: 30,
            delay: Duration::from_secs(1),
        }
    }
}

/// JSON-based manifest repository
pub struct JsonManifestRepository {
    retry: LockRetry,
    events: Arc<dyn SyncEventSink>,
}

impl JsonManifestRepository {
    pub fn new() -> Self {
        Self {
            retry: LockRetry::default(),
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_retry(mut self, retry: LockRetry) -> Self {
        self.retry = retry;
        self
    }

    /// Report lock contention through `events`
    pub fn with_events(mut self, events: Arc<dyn SyncEventSink>) -> Self {
        self.events = events;
        self
    }

    /// `<manifest>.lock` next to the manifest
    pub fn lock_path(path: &Path) -> PathBuf {
        let mut name = OsString::from(path.as_os_str());
        name.push(".lock");
        PathBuf::from(name)
    }
}

impl Default for JsonManifestRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive ownership of the lock marker; removes it on drop
struct LockMarker {
    path: PathBuf,
}

impl LockMarker {
    fn acquire(path: &Path) -> std::io::Result<Self> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let _ = writeln!(file, "{}", std::process::id());
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for LockMarker {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

impl ManifestRepository for JsonManifestRepository {
    fn load(&self, path: &Path) -> Result<Manifest, ManifestError> {
        if !path.exists() {
            return Ok(Manifest::new());
        }

        let content =
            fs::read_to_string(path).map_err(|e| ManifestError::IoError(e.to_string()))?;
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(|e| ManifestError::ParseError(e.to_string()))?;

        Ok(Manifest::from_map(entries))
    }

    fn save(&self, manifest: &Manifest, path: &Path) -> Result<(), ManifestError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ManifestError::IoError(e.to_string()))?;
            }
        }

        let content = serde_json::to_string_pretty(manifest.entries())
            .map_err(|e| ManifestError::IoError(e.to_string()))?;

        let lock_path = Self::lock_path(path);
        let attempts = self.retry.attempts.max(1);

        for attempt in 1..=attempts {
            match LockMarker::acquire(&lock_path) {
                Ok(_marker) => {
                    return LocalFs::write_atomic(path, content.as_bytes())
                        .map_err(|e| ManifestError::IoError(e.to_string()));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    self.events.on_event(SyncEvent::ManifestLockContended {
                        path: path.to_path_buf(),
                        attempt,
                    });
                    if attempt < attempts {
                        thread::sleep(self.retry.delay);
                    }
                }
                Err(e) => return Err(ManifestError::IoError(e.to_string())),
            }
        }

        Err(ManifestError::Locked {
            path: path.to_path_buf(),
            attempts,
        })
    }
}
