//! Configuration module for Stylesync
//!
//! Resolution order:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (STYLESYNC_*)
//! 3. `--config PATH`, or `stylesync.toml` in the working directory
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{ConfigWarning, CONFIG_FILE_NAME};
pub use types::{CompilerConfig, Config, EntryConfig, ManifestConfig, OutputConfig};
