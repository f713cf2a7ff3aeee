//! JSON Event Sink
//!
//! Outputs sync events as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::domain::ports::{SyncEvent, SyncEventSink};

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, mut event: serde_json::Value) {
        if let Some(object) = event.as_object_mut() {
            object.insert("command".into(), "compile".into());
            object.insert("timestamp".into(), chrono::Utc::now().to_rfc3339().into());
        }
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

fn path(p: &Path) -> String {
    p.display().to_string()
}

impl SyncEventSink for JsonEventSink {
    fn on_event(&self, event: SyncEvent) {
        let json = match event {
            SyncEvent::EntryStarted { source, output } => serde_json::json!({
                "event": "entry_start",
                "source": path(&source),
                "output": path(&output),
            }),
            SyncEvent::DirectoryCreated { path: dir } => serde_json::json!({
                "event": "dir_created",
                "path": path(&dir),
            }),
            SyncEvent::DirectoryMissing { path: dir } => serde_json::json!({
                "event": "dir_missing",
                "path": path(&dir),
            }),
            SyncEvent::FileWritten { source, artifact } => serde_json::json!({
                "event": "item_written",
                "source": path(&source),
                "artifact": path(&artifact),
            }),
            SyncEvent::FileUnchanged { source, artifact } => serde_json::json!({
                "event": "item_unchanged",
                "source": path(&source),
                "artifact": path(&artifact),
            }),
            SyncEvent::CompileFailed { source, error } => serde_json::json!({
                "event": "item_error",
                "stage": "compile",
                "path": path(&source),
                "error": error,
            }),
            SyncEvent::WriteFailed { path: file, error } => serde_json::json!({
                "event": "item_error",
                "stage": "write",
                "path": path(&file),
                "error": error,
            }),
            SyncEvent::DirectoryUnreadable { path: dir, error } => serde_json::json!({
                "event": "item_error",
                "stage": "list",
                "path": path(&dir),
                "error": error,
            }),
            SyncEvent::ArtifactDeleted { path: file } => serde_json::json!({
                "event": "item_deleted",
                "path": path(&file),
            }),
            SyncEvent::DirectoryPruned { path: dir } => serde_json::json!({
                "event": "dir_pruned",
                "path": path(&dir),
            }),
            SyncEvent::DeleteFailed { path: file, error } => serde_json::json!({
                "event": "item_error",
                "stage": "delete",
                "path": path(&file),
                "error": error,
            }),
            SyncEvent::ManifestEntryRemoved { key } => serde_json::json!({
                "event": "manifest_removed",
                "key": key,
            }),
            SyncEvent::ManifestSaved { path: file, entries } => serde_json::json!({
                "event": "manifest_saved",
                "path": path(&file),
                "entries": entries,
            }),
            SyncEvent::ManifestLockContended { path: file, attempt } => serde_json::json!({
                "event": "manifest_locked",
                "path": path(&file),
                "attempt": attempt,
            }),
            SyncEvent::ManifestSaveFailed { path: file, error } => serde_json::json!({
                "event": "item_error",
                "stage": "manifest",
                "path": path(&file),
                "error": error,
            }),
            SyncEvent::WatchStarted { source } => serde_json::json!({
                "event": "watch_started",
                "source": path(&source),
            }),
            SyncEvent::WatchFailed { source, error } => serde_json::json!({
                "event": "item_error",
                "stage": "watch",
                "path": path(&source),
                "error": error,
            }),
            SyncEvent::ChangeDetected { kind, path: file } => serde_json::json!({
                "event": "change",
                "kind": kind.as_str(),
                "path": path(&file),
            }),
            SyncEvent::QueueActionFailed {
                kind,
                path: file,
                error,
            } => serde_json::json!({
                "event": "item_error",
                "stage": kind.as_str(),
                "path": path(&file),
                "error": error,
            }),
            SyncEvent::ReconcileComplete {
                source,
                written,
                unchanged,
                failed,
                deleted,
                pruned,
            } => serde_json::json!({
                "event": "complete",
                "source": path(&source),
                "written": written,
                "unchanged": unchanged,
                "failed": failed,
                "deleted": deleted,
                "pruned": pruned,
            }),
            SyncEvent::EntryFailed { source, error } => serde_json::json!({
                "event": "error",
                "source": path(&source),
                "error": error,
            }),
            SyncEvent::EntryStopped { source } => serde_json::json!({
                "event": "entry_stopped",
                "source": path(&source),
            }),
        };

        self.write_event(json);
    }
}
