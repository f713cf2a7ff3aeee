//! Event Sink Implementations
//!
//! Provides concrete implementations of SyncEventSink:
//! - LogEventSink: human-readable lines through the `log` facade
//! - JsonEventSink: NDJSON output for CI/automation

mod json;
mod logging;

pub use self::json::JsonEventSink;
pub use self::logging::LogEventSink;
