//! Stylesync - incremental stylesheet build pipeline
//!
//! Keeps generated output trees in step with stylesheet source trees. Each
//! configured entry is reconciled in full on startup (compile every matching
//! source, delete every artifact without a source, prune emptied
//! directories) and then, in watch mode, incrementally as the source tree
//! changes. An optional JSON manifest records which artifact each source
//! produced.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    ChangeEvent, ChangeQueue, CompileSummary, Compiler, CompilerContext, EntryCompiler,
};
pub use config::{Config, ConfigWarning};
pub use domain::entities::{Entry, Manifest, ManifestLocation};
pub use domain::ports::{
    ChangeKind, CompileError, CompileOptions, CompiledStyle, FileSystem, ManifestRepository,
    NoopEventSink, OutputStyle, StyleCompiler, SyncEvent, SyncEventSink,
};
pub use domain::services::{CancelToken, ManifestStore, ReconcileReport, TreeReconciler};
pub use domain::value_objects::{ContentHash, FileMatcher, FilenameTemplate};
pub use error::{StyleSyncError, StyleSyncResult};
pub use infrastructure::{
    JsonEventSink, JsonManifestRepository, LocalFs, LockRetry, LogEventSink, SassCommand,
};
