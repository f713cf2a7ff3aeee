//! Entry Entity
//!
//! One configured mapping from a source tree to an output tree. Built once
//! from configuration and never mutated afterwards.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::{FileMatcher, FilenameTemplate};

/// Manifest filename used when the configuration names only a directory
pub const DEFAULT_MANIFEST_FILENAME: &str = "manifest.json";

/// Where an entry's manifest is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLocation {
    /// Directory holding the manifest
    pub dir: PathBuf,
    /// File name inside `dir`
    pub filename: String,
}

impl ManifestLocation {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            filename: DEFAULT_MANIFEST_FILENAME.to_string(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// `{dir}/{filename}`
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }
}

/// A source tree to output tree mapping
#[derive(Debug, Clone)]
pub struct Entry {
    /// Absolute source root; must be an existing directory before reconciliation
    pub source_dir: PathBuf,
    /// Absolute output root; created on demand
    pub output_dir: PathBuf,
    /// Which source basenames are compiled
    pub matcher: FileMatcher,
    /// Artifact naming scheme
    pub template: FilenameTemplate,
    /// Compressed output style
    pub minify: bool,
    /// Emit source maps
    pub source_map: bool,
    /// Optional manifest
    pub manifest: Option<ManifestLocation>,
}

impl Entry {
    /// Create an entry with the default matcher and template
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            matcher: FileMatcher::default(),
            template: FilenameTemplate::default(),
            minify: true,
            source_map: true,
            manifest: None,
        }
    }

    pub fn with_matcher(mut self, matcher: FileMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_template(mut self, template: FilenameTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn with_source_map(mut self, source_map: bool) -> Self {
        self.source_map = source_map;
        self
    }

    pub fn with_manifest(mut self, manifest: ManifestLocation) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Whether a basename is a source of this entry
    pub fn matches(&self, basename: &str) -> bool {
        self.matcher.matches(basename)
    }

    /// Mirror a path under `source_dir` onto the output tree
    ///
    /// Returns `None` for paths outside the source tree.
    pub fn mirror_to_output(&self, source_path: &Path) -> Option<PathBuf> {
        source_path
            .strip_prefix(&self.source_dir)
            .ok()
            .map(|rel| self.output_dir.join(rel))
    }

    /// Sources and artifacts share one directory tree
    pub fn is_in_place(&self) -> bool {
        self.source_dir == self.output_dir
    }
}
