//! Top-level Compiler
//!
//! Builds one `EntryCompiler` per configured entry and runs them side by side.
//! A failing entry is reported and never aborts its siblings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use crate::domain::entities::Entry;
use crate::domain::ports::{
    FileSystem, ManifestRepository, StyleCompiler, SyncEvent, SyncEventSink,
};
use crate::domain::services::{ManifestStore, ReconcileReport, TreeReconciler};

use super::entry_compiler::EntryCompiler;

/// Outcome of compiling every entry once
#[derive(Debug, Default)]
pub struct CompileSummary {
    /// Source roots that reconciled
    pub succeeded: Vec<PathBuf>,
    /// Source roots that failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
    /// Combined report of the successful entries
    pub report: ReconcileReport,
}

impl CompileSummary {
    /// Every entry reconciled
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Every entry reconciled and every source compiled
    pub fn is_clean(&self) -> bool {
        self.is_success() && self.report.failed.is_empty()
    }
}

/// Collaborators shared by every entry
#[derive(Clone)]
pub struct CompilerContext {
    /// Working directory; manifest keys are relative to it
    pub root: PathBuf,
    pub fs: Arc<dyn FileSystem>,
    pub compiler: Arc<dyn StyleCompiler>,
    pub repository: Arc<dyn ManifestRepository>,
    pub events: Arc<dyn SyncEventSink>,
}

pub struct Compiler {
    entries: Vec<EntryCompiler>,
    events: Arc<dyn SyncEventSink>,
}

impl Compiler {
    pub fn new(entries: Vec<EntryCompiler>, events: Arc<dyn SyncEventSink>) -> Self {
        Self { entries, events }
    }

    /// Wire entries to their collaborators
    ///
    /// Entries whose manifests resolve to the same file share one store.
    pub fn build(entries: Vec<Entry>, watch: bool, context: &CompilerContext) -> Self {
        let mut stores: HashMap<PathBuf, Arc<ManifestStore>> = HashMap::new();
        let compilers = entries
            .into_iter()
            .map(|entry| {
                let store = entry.manifest.as_ref().map(|location| {
                    stores
                        .entry(location.path())
                        .or_insert_with(|| {
                            Arc::new(ManifestStore::open(
                                location.path(),
                                context.repository.clone(),
                                context.events.clone(),
                            ))
                        })
                        .clone()
                });
                let mut reconciler = TreeReconciler::new(
                    entry,
                    &context.root,
                    context.fs.clone(),
                    context.compiler.clone(),
                    context.events.clone(),
                );
                if let Some(store) = store {
                    reconciler = reconciler.with_manifest(store);
                }
                EntryCompiler::new(reconciler, watch, context.events.clone())
            })
            .collect();

        Self::new(compilers, context.events.clone())
    }

    pub fn entries(&self) -> &[EntryCompiler] {
        &self.entries
    }

    /// Compile every entry concurrently
    pub fn compile(&self) -> CompileSummary {
        let results: Vec<(PathBuf, Result<ReconcileReport, String>)> = thread::scope(|scope| {
            let handles: Vec<_> = self
                .entries
                .iter()
                .map(|entry| {
                    let source = entry.entry().source_dir.clone();
                    (source, scope.spawn(move || entry.compile()))
                })
                .collect();
            handles
                .into_iter()
                .map(|(source, handle)| {
                    let result = match handle.join() {
                        Ok(result) => result.map_err(|e| e.to_string()),
                        Err(_) => Err("entry compiler panicked".to_string()),
                    };
                    (source, result)
                })
                .collect()
        });

        let mut summary = CompileSummary::default();
        for (source, result) in results {
            match result {
                Ok(report) => {
                    summary.report.merge(report);
                    summary.succeeded.push(source);
                }
                Err(error) => {
                    self.events.on_event(SyncEvent::EntryFailed {
                        source: source.clone(),
                        error: error.clone(),
                    });
                    summary.failed.push((source, error));
                }
            }
        }
        summary
    }

    /// Any entry has a live watcher
    pub fn is_watching(&self) -> bool {
        self.entries.iter().any(EntryCompiler::is_watching)
    }

    pub fn flush(&self) {
        for entry in &self.entries {
            entry.flush();
        }
    }

    pub fn stop(&self) {
        for entry in &self.entries {
            entry.stop();
        }
    }

    /// Entry whose source root is `source`
    pub fn entry_for(&self, source: &Path) -> Option<&EntryCompiler> {
        self.entries.iter().find(|e| e.entry().source_dir == source)
    }
}
