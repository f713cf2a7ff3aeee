//! Tree Reconciler
//!
//! Keeps an entry's output tree consistent with its source tree.
//!
//! - **Forward pass** compiles every matching source and writes its artifact
//!   into the mirrored output directory.
//! - **Reverse pass** walks the output tree and deletes artifacts whose
//!   source no longer exists (or no longer matches), removes output
//!   directories whose source directory is gone, and prunes directories left
//!   empty.
//! - **Targeted removal** handles a single deleted source file or directory
//!   without walking the whole tree.
//!
//! Failures on one file or directory are reported through the event sink and
//! never abort the rest of the pass. The output root itself is never removed.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::domain::entities::Entry;
use crate::domain::ports::{CompileOptions, FileSystem, StyleCompiler, SyncEvent, SyncEventSink};
use crate::error::StyleSyncResult;

use super::{CancelToken, ManifestStore};

/// What a pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Artifacts created or rewritten
    pub written: Vec<PathBuf>,
    /// Artifacts already up to date
    pub unchanged: Vec<PathBuf>,
    /// Sources that failed to compile or write
    pub failed: Vec<PathBuf>,
    /// Artifacts deleted
    pub deleted: Vec<PathBuf>,
    /// Output directories removed
    pub pruned: Vec<PathBuf>,
}

impl ReconcileReport {
    pub fn merge(&mut self, other: ReconcileReport) {
        self.written.extend(other.written);
        self.unchanged.extend(other.unchanged);
        self.failed.extend(other.failed);
        self.deleted.extend(other.deleted);
        self.pruned.extend(other.pruned);
    }

    /// Nothing on disk was touched
    pub fn is_noop(&self) -> bool {
        self.written.is_empty() && self.deleted.is_empty() && self.pruned.is_empty()
    }
}

/// Reconciles one entry's source and output trees
pub struct TreeReconciler {
    entry: Entry,
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    compiler: Arc<dyn StyleCompiler>,
    manifest: Option<Arc<ManifestStore>>,
    events: Arc<dyn SyncEventSink>,
    cancel: CancelToken,
}

impl TreeReconciler {
    /// `root` is the working directory manifest keys are relative to
    pub fn new(
        entry: Entry,
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        compiler: Arc<dyn StyleCompiler>,
        events: Arc<dyn SyncEventSink>,
    ) -> Self {
        Self {
            entry,
            root: root.into(),
            fs,
            compiler,
            manifest: None,
            events,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_manifest(mut self, manifest: Arc<ManifestStore>) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn manifest(&self) -> Option<&Arc<ManifestStore>> {
        self.manifest.as_ref()
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Manifest key of a source: relative to root, extension stripped
    pub fn source_key(&self, source: &Path) -> String {
        relative_key(&self.root, &source.with_extension(""))
    }

    /// Manifest value of an artifact: relative to root
    pub fn artifact_key(&self, artifact: &Path) -> String {
        relative_key(&self.root, artifact)
    }

    /// Forward pass followed by reverse pass
    pub fn reconcile(&self) -> StyleSyncResult<ReconcileReport> {
        let mut report = self.forward_pass()?;
        report.merge(self.reverse_pass()?);
        self.report_complete(&report);
        Ok(report)
    }

    /// Compile every matching source under the source root
    pub fn forward_pass(&self) -> StyleSyncResult<ReconcileReport> {
        let mut report = ReconcileReport::default();
        let names = self.fs.list_dir(&self.entry.source_dir)?;
        self.process_dir(&self.entry.source_dir, &self.entry.output_dir, names, &mut report)?;
        Ok(report)
    }

    /// Delete stray artifacts and prune the output tree
    pub fn reverse_pass(&self) -> StyleSyncResult<ReconcileReport> {
        let mut report = ReconcileReport::default();
        self.process_output_dir(&self.entry.source_dir, &self.entry.output_dir, &mut report)?;
        Ok(report)
    }

    /// Remove the artifacts of a deleted source file
    pub fn remove_source_file(&self, source: &Path) -> StyleSyncResult<ReconcileReport> {
        let mut report = ReconcileReport::default();
        let Some(mirrored) = self.entry.mirror_to_output(source) else {
            return Ok(report);
        };
        let Some(stem) = source.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            return Ok(report);
        };
        let source_parent = source.parent().unwrap_or(self.entry.source_dir.as_path());
        let output_parent = mirrored.parent().unwrap_or(self.entry.output_dir.as_path());

        // A sibling source with the same basename still owns the artifact.
        let still_owned = self
            .fs
            .list_dir(source_parent)
            .map(|names| names.iter().any(|n| self.is_source_for(source_parent, n, &stem)))
            .unwrap_or(false);

        if !still_owned && self.fs.is_dir(output_parent) {
            let extension = self.entry.template.output_extension();
            for name in self.fs.list_dir(output_parent)? {
                self.cancel.check()?;
                let artifact = output_parent.join(&name);
                if !name.ends_with(extension)
                    || self.fs.is_dir(&artifact)
                    || self.entry.template.recover(&name) != stem
                {
                    continue;
                }
                self.delete_artifact(&artifact, &mut report);
            }
        }

        if let Some(manifest) = &self.manifest {
            if !still_owned {
                manifest.delete(&self.source_key(source));
            }
        }

        self.prune_upward(output_parent, &mut report);
        Ok(report)
    }

    /// Remove the output subtree of a deleted source directory
    pub fn remove_source_dir(&self, source_dir: &Path) -> StyleSyncResult<ReconcileReport> {
        let mut report = ReconcileReport::default();
        let Some(mirrored) = self.entry.mirror_to_output(source_dir) else {
            return Ok(report);
        };
        if mirrored == self.entry.output_dir || self.entry.is_in_place() {
            return Ok(report);
        }
        if self.fs.is_dir(&mirrored) && self.is_prunable(&mirrored) {
            self.delete_dir(&mirrored, &mut report);
        }
        if let Some(parent) = mirrored.parent() {
            self.prune_upward(parent, &mut report);
        }
        Ok(report)
    }

    /// Forget mappings under this entry's output root whose artifact is gone
    pub fn prune_manifest(&self) {
        let Some(manifest) = &self.manifest else {
            return;
        };
        let output_key = self.artifact_key(&self.entry.output_dir);
        let output_prefix = format!("{}/", output_key);
        manifest.retain(|_, artifact| {
            let under_output = output_key.is_empty() || artifact.starts_with(&output_prefix);
            !under_output || self.fs.exists(&self.root.join(artifact))
        });
    }

    /// Emit a completion summary
    pub fn report_complete(&self, report: &ReconcileReport) {
        self.events.on_event(SyncEvent::ReconcileComplete {
            source: self.entry.source_dir.clone(),
            written: report.written.len(),
            unchanged: report.unchanged.len(),
            failed: report.failed.len(),
            deleted: report.deleted.len(),
            pruned: report.pruned.len(),
        });
    }

    fn process_dir(
        &self,
        dir: &Path,
        output_dir: &Path,
        names: Vec<String>,
        report: &mut ReconcileReport,
    ) -> StyleSyncResult<()> {
        for name in names {
            self.cancel.check()?;
            let path = dir.join(&name);
            if self.fs.is_dir(&path) {
                if self.is_foreign_output(&path) {
                    continue;
                }
                match self.fs.list_dir(&path) {
                    Ok(children) => {
                        self.process_dir(&path, &output_dir.join(&name), children, report)?
                    }
                    Err(e) => self.events.on_event(SyncEvent::DirectoryUnreadable {
                        path: path.clone(),
                        error: e.to_string(),
                    }),
                }
            } else if self.entry.matches(&name) {
                self.process_file(&path, output_dir, report);
            }
        }
        Ok(())
    }

    fn process_file(&self, source: &Path, output_dir: &Path, report: &mut ReconcileReport) {
        let options = CompileOptions::new(self.entry.minify, self.entry.source_map);
        let compiled = match self.compiler.compile(source, &options) {
            Ok(compiled) => compiled,
            Err(e) => {
                self.events.on_event(SyncEvent::CompileFailed {
                    source: source.to_path_buf(),
                    error: e.message,
                });
                report.failed.push(source.to_path_buf());
                return;
            }
        };

        let file_name = self.entry.template.render(source, &compiled.content);
        let artifact = output_dir.join(&file_name);

        let up_to_date = self.fs.exists(&artifact)
            && self
                .fs
                .read(&artifact)
                .map(|current| current == compiled.content)
                .unwrap_or(false);

        if up_to_date {
            self.events.on_event(SyncEvent::FileUnchanged {
                source: source.to_path_buf(),
                artifact: artifact.clone(),
            });
            report.unchanged.push(artifact.clone());
        } else {
            if let Err(e) = self.fs.write(&artifact, &compiled.content) {
                self.events.on_event(SyncEvent::WriteFailed {
                    path: artifact.clone(),
                    error: e.to_string(),
                });
                report.failed.push(source.to_path_buf());
                return;
            }
            self.events.on_event(SyncEvent::FileWritten {
                source: source.to_path_buf(),
                artifact: artifact.clone(),
            });
            report.written.push(artifact.clone());
        }

        if self.entry.template.has_opaque_tokens() {
            self.remove_superseded(source, output_dir, &file_name, report);
        }

        if let Some(manifest) = &self.manifest {
            manifest.add(&self.source_key(source), &self.artifact_key(&artifact));
        }
    }

    /// Delete older variants (e.g. a previous `[hash]`) of a freshly written artifact
    fn remove_superseded(
        &self,
        source: &Path,
        output_dir: &Path,
        current: &str,
        report: &mut ReconcileReport,
    ) {
        let Some(stem) = source.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            return;
        };
        // Another source with this basename (`theme.scss` next to `theme.sass`)
        // writes into the same directory; its artifact looks like an older variant.
        if self.has_same_stem_sibling(source, &stem) {
            return;
        }
        let Ok(names) = self.fs.list_dir(output_dir) else {
            return;
        };
        let extension = self.entry.template.output_extension();
        for name in names {
            if name == current || !name.ends_with(extension) {
                continue;
            }
            let path = output_dir.join(&name);
            if !self.fs.is_dir(&path) && self.entry.template.recover(&name) == stem {
                self.delete_artifact(&path, report);
            }
        }
    }

    fn process_output_dir(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        report: &mut ReconcileReport,
    ) -> StyleSyncResult<()> {
        self.cancel.check()?;
        if !self.fs.is_dir(output_dir) {
            self.events.on_event(SyncEvent::DirectoryMissing {
                path: output_dir.to_path_buf(),
            });
            return Ok(());
        }

        let names = match self.fs.list_dir(output_dir) {
            Ok(names) => names,
            Err(e) if output_dir == self.entry.output_dir => return Err(e.into()),
            Err(e) => {
                self.events.on_event(SyncEvent::DirectoryUnreadable {
                    path: output_dir.to_path_buf(),
                    error: e.to_string(),
                });
                return Ok(());
            }
        };

        let input_names = if self.fs.is_dir(input_dir) {
            Some(self.fs.list_dir(input_dir).unwrap_or_default())
        } else {
            None
        };
        let extension = self.entry.template.output_extension();

        for name in names {
            self.cancel.check()?;
            let path = output_dir.join(&name);
            if self.fs.is_dir(&path) {
                if path == self.entry.source_dir {
                    continue;
                }
                self.process_output_dir(&input_dir.join(&name), &path, report)?;
                continue;
            }
            if !name.ends_with(extension) {
                continue;
            }

            match &input_names {
                None if self.is_prunable(output_dir) => {
                    // Source directory is gone: drop the whole mirrored subtree.
                    self.delete_dir(output_dir, report);
                    return Ok(());
                }
                None => self.delete_artifact(&path, report),
                Some(inputs) => {
                    let generated = self.entry.template.recover(&name);
                    let has_source = inputs
                        .iter()
                        .any(|input| self.is_source_for(input_dir, input, &generated));
                    if !has_source {
                        self.delete_artifact(&path, report);
                    }
                }
            }
        }

        if self.is_prunable(output_dir) && self.is_empty_dir(output_dir) {
            self.delete_dir(output_dir, report);
        }
        Ok(())
    }

    /// `name` in `dir` is a matching source file with basename `stem`
    fn is_source_for(&self, dir: &Path, name: &str, stem: &str) -> bool {
        let path = Path::new(name);
        path.file_stem().map(|s| s.to_string_lossy() == stem).unwrap_or(false)
            && self.entry.matches(name)
            && !self.fs.is_dir(&dir.join(name))
    }

    /// Some other matching source next to `source` has basename `stem`
    fn has_same_stem_sibling(&self, source: &Path, stem: &str) -> bool {
        let (Some(dir), Some(own_name)) = (source.parent(), source.file_name()) else {
            return false;
        };
        let own_name = own_name.to_string_lossy();
        self.fs
            .list_dir(dir)
            .map(|names| {
                names
                    .iter()
                    .any(|n| n.as_str() != &*own_name && self.is_source_for(dir, n, stem))
            })
            .unwrap_or(false)
    }

    /// Output root nested inside the source tree; never treated as sources
    fn is_foreign_output(&self, path: &Path) -> bool {
        !self.entry.is_in_place() && path == self.entry.output_dir
    }

    /// Directory may be removed without touching the output root or source tree
    fn is_prunable(&self, dir: &Path) -> bool {
        dir != self.entry.output_dir
            && dir.starts_with(&self.entry.output_dir)
            && !self.entry.is_in_place()
            && !self.entry.source_dir.starts_with(dir)
    }

    fn is_empty_dir(&self, dir: &Path) -> bool {
        self.fs.list_dir(dir).map(|n| n.is_empty()).unwrap_or(false)
    }

    /// Remove empty directories from `dir` up to (not including) the output root
    fn prune_upward(&self, dir: &Path, report: &mut ReconcileReport) {
        let mut current = Some(dir);
        while let Some(dir) = current {
            if !self.is_prunable(dir) || !self.fs.is_dir(dir) || !self.is_empty_dir(dir) {
                break;
            }
            if !self.delete_dir(dir, report) {
                break;
            }
            current = dir.parent();
        }
    }

    fn delete_artifact(&self, path: &Path, report: &mut ReconcileReport) {
        match self.fs.remove_file(path) {
            Ok(()) => {
                self.events.on_event(SyncEvent::ArtifactDeleted {
                    path: path.to_path_buf(),
                });
                report.deleted.push(path.to_path_buf());
                if let Some(manifest) = &self.manifest {
                    manifest.remove_artifact(&self.artifact_key(path));
                }
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => self.events.on_event(SyncEvent::DeleteFailed {
                path: path.to_path_buf(),
                error: e.to_string(),
            }),
        }
    }

    fn delete_dir(&self, path: &Path, report: &mut ReconcileReport) -> bool {
        match self.fs.remove_dir_all(path) {
            Ok(()) => {
                self.events.on_event(SyncEvent::DirectoryPruned {
                    path: path.to_path_buf(),
                });
                report.pruned.push(path.to_path_buf());
                if let Some(manifest) = &self.manifest {
                    manifest.remove_artifacts_under(&self.artifact_key(path));
                }
                true
            }
            Err(e) => {
                self.events.on_event(SyncEvent::DeleteFailed {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
                false
            }
        }
    }
}

/// `path` relative to `root` with `/` separators, or the full path when outside `root`
pub fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::RootDir => Some(String::new()),
            Component::Prefix(prefix) => Some(prefix.as_os_str().to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::CurDir => None,
        })
        .collect();
    parts.join("/")
}
