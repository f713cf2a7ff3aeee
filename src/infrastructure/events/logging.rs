//! Log Event Sink
//!
//! Forwards sync events to the `log` facade. Failures are `warn`/`error`,
//! lifecycle transitions are `info`, per-file detail is `debug`.

use crate::domain::ports::{SyncEvent, SyncEventSink};

/// Event sink backed by whatever logger the binary installed
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl SyncEventSink for LogEventSink {
    fn on_event(&self, event: SyncEvent) {
        match event {
            SyncEvent::EntryStarted { source, output } => {
                log::info!("compiling {} -> {}", source.display(), output.display());
            }
            SyncEvent::DirectoryCreated { path } => {
                log::info!("created {}", path.display());
            }
            SyncEvent::DirectoryMissing { path } => {
                log::debug!("{} is gone", path.display());
            }
            SyncEvent::FileWritten { source, artifact } => {
                log::info!("{} -> {}", source.display(), artifact.display());
            }
            SyncEvent::FileUnchanged { artifact, .. } => {
                log::debug!("{} unchanged", artifact.display());
            }
            SyncEvent::CompileFailed { source, error } => {
                log::error!("failed to compile {}: {}", source.display(), error);
            }
            SyncEvent::WriteFailed { path, error } => {
                log::error!("failed to write {}: {}", path.display(), error);
            }
            SyncEvent::DirectoryUnreadable { path, error } => {
                log::warn!("skipping {}: {}", path.display(), error);
            }
            SyncEvent::ArtifactDeleted { path } => {
                log::info!("deleted {}", path.display());
            }
            SyncEvent::DirectoryPruned { path } => {
                log::info!("removed directory {}", path.display());
            }
            SyncEvent::DeleteFailed { path, error } => {
                log::warn!("failed to delete {}: {}", path.display(), error);
            }
            SyncEvent::ManifestEntryRemoved { key } => {
                log::debug!("manifest: dropped {}", key);
            }
            SyncEvent::ManifestSaved { path, entries } => {
                log::debug!("manifest {} saved ({} entries)", path.display(), entries);
            }
            SyncEvent::ManifestLockContended { path, attempt } => {
                log::debug!("manifest {} locked, attempt {}", path.display(), attempt);
            }
            SyncEvent::ManifestSaveFailed { path, error } => {
                log::error!("failed to save manifest {}: {}", path.display(), error);
            }
            SyncEvent::WatchStarted { source } => {
                log::info!("watching {}", source.display());
            }
            SyncEvent::WatchFailed { source, error } => {
                log::warn!("watcher error for {}: {}", source.display(), error);
            }
            SyncEvent::ChangeDetected { kind, path } => {
                log::debug!("{} {}", kind, path.display());
            }
            SyncEvent::QueueActionFailed { kind, path, error } => {
                log::warn!("{} {} failed: {}", kind, path.display(), error);
            }
            SyncEvent::ReconcileComplete {
                source,
                written,
                unchanged,
                failed,
                deleted,
                pruned,
            } => {
                log::info!(
                    "{}: {} written, {} unchanged, {} failed, {} deleted, {} pruned",
                    source.display(),
                    written,
                    unchanged,
                    failed,
                    deleted,
                    pruned
                );
            }
            SyncEvent::EntryFailed { source, error } => {
                log::error!("{}: {}", source.display(), error);
            }
            SyncEvent::EntryStopped { source } => {
                log::info!("stopped watching {}", source.display());
            }
        }
    }
}
