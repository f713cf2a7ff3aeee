//! Configuration loading and entry resolution

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::domain::entities::{Entry, ManifestLocation, DEFAULT_MANIFEST_FILENAME};
use crate::domain::value_objects::{FileMatcher, FilenameTemplate};
use crate::error::{StyleSyncError, StyleSyncResult};

use super::types::{Config, EntryConfig};

/// Configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "stylesync.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> StyleSyncResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| StyleSyncError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let mut config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| StyleSyncError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;
    config.origin = Some(path.to_path_buf());

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Explicit path (must exist), else `stylesync.toml` under `root`, else defaults
pub fn discover(root: &Path, explicit: Option<&Path>) -> StyleSyncResult<(Config, Vec<ConfigWarning>)> {
    let (config, warnings) = match explicit {
        Some(path) => load_with_warnings(&root.join(path))?,
        None => {
            let default_path = root.join(CONFIG_FILE_NAME);
            if default_path.is_file() {
                load_with_warnings(&default_path)?
            } else {
                (Config::default(), Vec::new())
            }
        }
    };
    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides (STYLESYNC_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    // STYLESYNC_SASS
    if let Ok(program) = std::env::var("STYLESYNC_SASS") {
        if !program.trim().is_empty() {
            config.compiler.program = program.trim().to_string();
        }
    }

    // STYLESYNC_WATCH
    if let Ok(val) = std::env::var("STYLESYNC_WATCH") {
        config.watch = matches!(val.to_lowercase().as_str(), "1" | "true" | "yes");
    }

    config
}

/// Turn one `[[entries]]` table into an absolute `Entry`
pub fn resolve_entry(
    config: &EntryConfig,
    root: &Path,
    watch: bool,
    origin: Option<&Path>,
) -> StyleSyncResult<Entry> {
    let source_dir = normalize(&root.join(&config.base_dir));
    let output_dir = config
        .output
        .directory
        .as_ref()
        .or(config.output_dir.as_ref())
        .map(|dir| normalize(&root.join(dir)))
        .unwrap_or_else(|| source_dir.clone());

    let matcher = match &config.filenames {
        Some(pattern) => FileMatcher::new(pattern).map_err(|e| StyleSyncError::Config {
            file: origin.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
            message: format!("invalid filenames pattern {:?}: {}", pattern, e),
        })?,
        None => FileMatcher::default(),
    };

    let mut entry = Entry::new(source_dir, output_dir)
        .with_matcher(matcher)
        .with_template(FilenameTemplate::from_option(config.output.filename.as_deref()))
        .with_minify(config.minify.unwrap_or(!watch))
        .with_source_map(config.source_map.unwrap_or(!watch));

    if let Some(manifest) = &config.output.manifest {
        let dir = manifest.path.as_deref().unwrap_or(Path::new("."));
        let filename = manifest
            .filename
            .as_deref()
            .unwrap_or(DEFAULT_MANIFEST_FILENAME);
        entry = entry.with_manifest(
            ManifestLocation::new(normalize(&root.join(dir))).with_filename(filename),
        );
    }

    Ok(entry)
}

/// Lexically drop `.` and fold `..` so equal directories compare equal
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

/// Closest known key within an edit distance of 2
fn suggest_key(unknown: &str) -> Option<String> {
    const KNOWN_KEYS: &[&str] = &[
        "compiler",
        "program",
        "watch",
        "entries",
        "base_dir",
        "output_dir",
        "filenames",
        "minify",
        "source_map",
        "output",
        "directory",
        "filename",
        "manifest",
        "path",
    ];

    KNOWN_KEYS
        .iter()
        .map(|key| (*key, edit_distance(unknown, key)))
        .filter(|(_, dist)| *dist <= 2)
        .min_by_key(|(_, dist)| *dist)
        .map(|(key, _)| key.to_string())
}

/// Levenshtein distance over bytes, single-row
fn edit_distance(a: &str, b: &str) -> usize {
    let b = b.as_bytes();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, &ac) in a.as_bytes().iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &bc) in b.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ac != bc);
            row[j + 1] = substitution.min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }

    row[b.len()]
}
