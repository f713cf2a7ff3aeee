//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::Entry;
use crate::error::StyleSyncResult;
use crate::infrastructure::compiler::DEFAULT_PROGRAM;

use super::loader::{self, ConfigWarning};

/// Compile collaborator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

/// `[entries.output.manifest]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Directory holding the manifest
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Manifest file name (default `manifest.json`)
    #[serde(default)]
    pub filename: Option<String>,
}

/// `[entries.output]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output root; takes precedence over `output_dir`
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Artifact filename template, e.g. `[name].[hash].css`
    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default)]
    pub manifest: Option<ManifestConfig>,
}

/// One `[[entries]]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Regex over source basenames
    #[serde(default)]
    pub filenames: Option<String>,

    #[serde(default)]
    pub minify: Option<bool>,

    #[serde(default)]
    pub source_map: Option<bool>,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            output_dir: None,
            filenames: None,
            minify: None,
            source_map: None,
            output: OutputConfig::default(),
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Keep watching after the initial compile
    #[serde(default)]
    pub watch: bool,

    #[serde(default)]
    pub entries: Vec<EntryConfig>,

    /// File this configuration was read from
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> StyleSyncResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> StyleSyncResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load `explicit`, else `stylesync.toml` under `root`, else defaults
    pub fn discover(
        root: &Path,
        explicit: Option<&Path>,
    ) -> StyleSyncResult<(Self, Vec<ConfigWarning>)> {
        loader::discover(root, explicit)
    }

    /// Apply environment variable overrides (STYLESYNC_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Configured entries, or the default entry when none are configured
    pub fn entry_configs(&self) -> Vec<EntryConfig> {
        if self.entries.is_empty() {
            vec![EntryConfig::default()]
        } else {
            self.entries.clone()
        }
    }

    /// Resolve entries against `root`
    pub fn resolve_entries(&self, root: &Path, watch: bool) -> StyleSyncResult<Vec<Entry>> {
        self.entry_configs()
            .iter()
            .map(|entry| loader::resolve_entry(entry, root, watch, self.origin.as_deref()))
            .collect()
    }
}
