//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Components
//!
//! - `Compiler` - Fans out over every configured entry
//! - `EntryCompiler` - Initial reconciliation plus the watch subscription of one entry
//! - `ChangeQueue` - Serialized executor for watch-triggered actions

pub mod change_queue;
pub mod compiler;
pub mod entry_compiler;
pub mod watch;

pub use change_queue::{ChangeEvent, ChangeQueue};
pub use compiler::{CompileSummary, Compiler, CompilerContext};
pub use entry_compiler::{EntryCompiler, CREATE_DIR_ATTEMPTS};
pub use watch::{classify, MAX_WATCH_DEPTH};
