//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Local file system
//! - `repositories/` - Manifest persistence
//! - `compiler/` - Sass compile collaborator
//! - `events/` - Event sinks (log facade, NDJSON)

pub mod compiler;
pub mod events;
pub mod fs;
pub mod repositories;

// Re-export for convenience
pub use compiler::SassCommand;
pub use events::{JsonEventSink, LogEventSink};
pub use fs::LocalFs;
pub use repositories::{JsonManifestRepository, LockRetry};
