//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod file_system;
pub mod manifest_repository;
pub mod style_compiler;
pub mod sync_events;

pub use file_system::{FileSystem, FsError, FsResult};
pub use manifest_repository::{ManifestError, ManifestRepository};
pub use style_compiler::{CompileError, CompileOptions, CompiledStyle, OutputStyle, StyleCompiler};
pub use sync_events::{ChangeKind, NoopEventSink, SyncEvent, SyncEventSink};
