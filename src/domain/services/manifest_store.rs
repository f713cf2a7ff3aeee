//! Manifest Store
//!
//! A `Manifest` bound to the file it persists to. Entries that target the same
//! manifest file share one store, so their mappings never overwrite each
//! other. Every mutating call persists immediately when the mapping changed.
//!
//! Persistence is best-effort: failures are reported through the event sink
//! and the in-memory mapping stays authoritative.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::entities::Manifest;
use crate::domain::ports::{ManifestRepository, SyncEvent, SyncEventSink};

pub struct ManifestStore {
    path: PathBuf,
    repository: Arc<dyn ManifestRepository>,
    manifest: Mutex<Manifest>,
    events: Arc<dyn SyncEventSink>,
}

impl ManifestStore {
    /// Open the store, loading any manifest already on disk
    pub fn open(
        path: impl Into<PathBuf>,
        repository: Arc<dyn ManifestRepository>,
        events: Arc<dyn SyncEventSink>,
    ) -> Self {
        let path = path.into();
        let manifest = repository.load_or_new(&path);
        Self {
            path,
            repository,
            manifest: Mutex::new(manifest),
            events,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Upsert a mapping, saving when it changed
    pub fn add(&self, source_key: &str, artifact: &str) {
        let mut manifest = self.lock();
        if manifest.add(source_key, artifact) {
            self.persist(&manifest);
        }
    }

    pub fn get(&self, source_key: &str) -> Option<String> {
        self.lock().get(source_key).map(str::to_string)
    }

    /// Remove a mapping, saving when one was removed
    pub fn delete(&self, source_key: &str) {
        let mut manifest = self.lock();
        if manifest.delete(source_key) {
            self.events.on_event(SyncEvent::ManifestEntryRemoved {
                key: source_key.to_string(),
            });
            self.persist(&manifest);
        }
    }

    /// Drop every mapping pointing at `artifact`
    pub fn remove_artifact(&self, artifact: &str) {
        let mut manifest = self.lock();
        let removed = manifest.remove_artifact(artifact);
        self.finish_removal(&manifest, removed);
    }

    /// Drop every mapping whose artifact lies under `dir`
    pub fn remove_artifacts_under(&self, dir: &str) {
        let mut manifest = self.lock();
        let removed = manifest.remove_artifacts_under(dir);
        self.finish_removal(&manifest, removed);
    }

    /// Keep only mappings for which `keep(key, artifact)` holds
    pub fn retain(&self, keep: impl FnMut(&str, &str) -> bool) {
        let mut manifest = self.lock();
        let removed = manifest.retain(keep);
        self.finish_removal(&manifest, removed);
    }

    /// Copy of the current mapping
    pub fn snapshot(&self) -> Manifest {
        self.lock().clone()
    }

    /// Persist the current mapping; `false` when the write failed
    pub fn save(&self) -> bool {
        let manifest = self.lock();
        self.persist(&manifest)
    }

    fn finish_removal(&self, manifest: &Manifest, removed: Vec<String>) {
        if removed.is_empty() {
            return;
        }
        for key in removed {
            self.events.on_event(SyncEvent::ManifestEntryRemoved { key });
        }
        self.persist(manifest);
    }

    // Called with the mutex held so in-process writers never interleave.
    fn persist(&self, manifest: &Manifest) -> bool {
        match self.repository.save(manifest, &self.path) {
            Ok(()) => {
                self.events.on_event(SyncEvent::ManifestSaved {
                    path: self.path.clone(),
                    entries: manifest.len(),
                });
                true
            }
            Err(e) => {
                self.events.on_event(SyncEvent::ManifestSaveFailed {
                    path: self.path.clone(),
                    error: e.to_string(),
                });
                false
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Manifest> {
        self.manifest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ManifestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
