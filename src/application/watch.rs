//! Watch event classification
//!
//! Maps raw `notify` events onto the four change kinds the queue understands.
//! Directories always pass the filter so nested sources are seen; files must
//! match the entry's matcher.

use std::path::{Path, PathBuf};

use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind};

use crate::domain::entities::Entry;
use crate::domain::ports::{ChangeKind, FileSystem};

/// Deepest source nesting followed by the watcher
pub const MAX_WATCH_DEPTH: usize = 10;

/// Backend polling interval, where the platform watcher polls
pub const POLL_INTERVAL_MS: u64 = 100;

/// Classify every path of `event`
pub fn classify(entry: &Entry, fs: &dyn FileSystem, event: &Event) -> Vec<(ChangeKind, PathBuf)> {
    event
        .paths
        .iter()
        .filter(|path| is_watched(entry, path))
        .filter_map(|path| classify_path(entry, fs, &event.kind, path).map(|k| (k, path.clone())))
        .collect()
}

fn classify_path(
    entry: &Entry,
    fs: &dyn FileSystem,
    kind: &EventKind,
    path: &Path,
) -> Option<ChangeKind> {
    let matches = file_name(path).map(|n| entry.matches(n)).unwrap_or(false);
    match kind {
        EventKind::Create(CreateKind::Folder) => Some(ChangeKind::Add),
        EventKind::Create(_) => (fs.is_dir(path) || matches).then_some(ChangeKind::Add),
        EventKind::Modify(ModifyKind::Name(_)) => {
            if fs.exists(path) {
                (fs.is_dir(path) || matches).then_some(ChangeKind::Add)
            } else {
                removed(entry, fs, path, matches)
            }
        }
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => (matches && !fs.is_dir(path)).then_some(ChangeKind::Change),
        EventKind::Remove(RemoveKind::Folder) => Some(ChangeKind::UnlinkDir),
        EventKind::Remove(RemoveKind::File) => matches.then_some(ChangeKind::Unlink),
        EventKind::Remove(_) => removed(entry, fs, path, matches),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}

/// A path that vanished without saying whether it was a file or directory
fn removed(entry: &Entry, fs: &dyn FileSystem, path: &Path, matches: bool) -> Option<ChangeKind> {
    let mirrored_dir = !entry.is_in_place()
        && entry
            .mirror_to_output(path)
            .map(|out| fs.is_dir(&out))
            .unwrap_or(false);
    if mirrored_dir {
        Some(ChangeKind::UnlinkDir)
    } else {
        matches.then_some(ChangeKind::Unlink)
    }
}

/// Inside the source tree, outside a nested output root, within the depth limit
fn is_watched(entry: &Entry, path: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(&entry.source_dir) else {
        return false;
    };
    if !entry.is_in_place() && path.starts_with(&entry.output_dir) {
        return false;
    }
    relative.components().count() <= MAX_WATCH_DEPTH + 1
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
