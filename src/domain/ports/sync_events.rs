//! Sync Event Port
//!
//! Observable interface for reconciliation. Every component receives a sink
//! at construction and reports its state transitions through it.

use std::path::PathBuf;

/// Kind of filesystem notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    Change,
    Unlink,
    UnlinkDir,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::Change => "change",
            ChangeKind::Unlink => "unlink",
            ChangeKind::UnlinkDir => "unlinkDir",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event emitted during reconciliation
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// Entry reconciliation started
    EntryStarted { source: PathBuf, output: PathBuf },

    /// Output root created
    DirectoryCreated { path: PathBuf },

    /// A directory to walk is gone
    DirectoryMissing { path: PathBuf },

    /// Source compiled and artifact written
    FileWritten { source: PathBuf, artifact: PathBuf },

    /// Source compiled to the content already on disk
    FileUnchanged { source: PathBuf, artifact: PathBuf },

    /// Compile collaborator rejected a source
    CompileFailed { source: PathBuf, error: String },

    /// Artifact could not be written
    WriteFailed { path: PathBuf, error: String },

    /// Directory could not be listed; its subtree is skipped
    DirectoryUnreadable { path: PathBuf, error: String },

    /// Stray or superseded artifact removed
    ArtifactDeleted { path: PathBuf },

    /// Output directory removed (empty, or its source directory is gone)
    DirectoryPruned { path: PathBuf },

    /// Removal failed; reconciliation continues
    DeleteFailed { path: PathBuf, error: String },

    /// Manifest mapping dropped
    ManifestEntryRemoved { key: String },

    /// Manifest persisted
    ManifestSaved { path: PathBuf, entries: usize },

    /// Manifest lock held by another writer; retrying
    ManifestLockContended { path: PathBuf, attempt: u32 },

    /// Manifest could not be persisted; in-memory state is kept
    ManifestSaveFailed { path: PathBuf, error: String },

    /// Filesystem watcher attached
    WatchStarted { source: PathBuf },

    /// Watcher reported an error; watching continues
    WatchFailed { source: PathBuf, error: String },

    /// Filesystem notification queued
    ChangeDetected { kind: ChangeKind, path: PathBuf },

    /// A queued action failed; the event is discarded
    QueueActionFailed {
        kind: ChangeKind,
        path: PathBuf,
        error: String,
    },

    /// A reconciliation finished
    ReconcileComplete {
        source: PathBuf,
        written: usize,
        unchanged: usize,
        failed: usize,
        deleted: usize,
        pruned: usize,
    },

    /// Entry could not be reconciled at all
    EntryFailed { source: PathBuf, error: String },

    /// Watcher detached and queue halted
    EntryStopped { source: PathBuf },
}

impl SyncEvent {
    /// Failure events, surfaced regardless of verbosity
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SyncEvent::CompileFailed { .. }
                | SyncEvent::WriteFailed { .. }
                | SyncEvent::DirectoryUnreadable { .. }
                | SyncEvent::DeleteFailed { .. }
                | SyncEvent::ManifestSaveFailed { .. }
                | SyncEvent::WatchFailed { .. }
                | SyncEvent::QueueActionFailed { .. }
                | SyncEvent::EntryFailed { .. }
        )
    }
}

/// Trait for receiving sync events
///
/// Implementations can be:
/// - LogEventSink: forwards to the `log` facade
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait SyncEventSink: Send + Sync {
    /// Handle a sync event
    fn on_event(&self, event: SyncEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl SyncEventSink for NoopEventSink {
    fn on_event(&self, _event: SyncEvent) {}
}
