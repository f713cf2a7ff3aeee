//! Manifest Entity
//!
//! Maps a source identity (source path relative to the working directory,
//! extension stripped) to the artifact path generated from it.
//!
//! Backed by a `BTreeMap` so iteration, and therefore the persisted
//! document, is always sorted by key.

use std::collections::BTreeMap;

/// Source key to artifact path mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Upsert a mapping; returns `true` when the mapping changed
    pub fn add(&mut self, source_key: impl Into<String>, artifact: impl Into<String>) -> bool {
        let artifact = artifact.into();
        match self.entries.insert(source_key.into(), artifact.clone()) {
            Some(previous) => previous != artifact,
            None => true,
        }
    }

    pub fn get(&self, source_key: &str) -> Option<&str> {
        self.entries.get(source_key).map(String::as_str)
    }

    /// Remove a mapping if present; returns `true` when something was removed
    pub fn delete(&mut self, source_key: &str) -> bool {
        self.entries.remove(source_key).is_some()
    }

    /// Remove every mapping pointing at `artifact`; returns the removed keys
    pub fn remove_artifact(&mut self, artifact: &str) -> Vec<String> {
        self.remove_where(|value| value == artifact)
    }

    /// Remove every mapping whose artifact lies under directory `dir`
    pub fn remove_artifacts_under(&mut self, dir: &str) -> Vec<String> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        self.remove_where(|value| value.starts_with(&prefix))
    }

    /// Keep only the mappings for which `keep(key, artifact)` holds
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) -> Vec<String> {
        let removed: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, value)| !keep(key, value))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &removed {
            self.entries.remove(key);
        }
        removed
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_where(&mut self, matches: impl Fn(&str) -> bool) -> Vec<String> {
        self.retain(|_, value| !matches(value))
    }
}
