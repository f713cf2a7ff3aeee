//! Entry Compiler
//!
//! Owns one entry: the initial full reconciliation and, in watch mode, the
//! filesystem watcher feeding the entry's change queue.
//!
//! The watcher is attached only after the initial reconciliation finished,
//! so it never races the initial pass. Everything after that runs on the
//! queue worker.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::domain::entities::Entry;
use crate::domain::ports::{ChangeKind, SyncEvent, SyncEventSink};
use crate::domain::services::{ReconcileReport, TreeReconciler};
use crate::error::{StyleSyncError, StyleSyncResult};

use super::change_queue::ChangeQueue;
use super::watch::{self, POLL_INTERVAL_MS};

/// Attempts at creating the output root
pub const CREATE_DIR_ATTEMPTS: u32 = 3;

const CREATE_DIR_RETRY_DELAY: Duration = Duration::from_millis(100);

struct WatchSession {
    // Dropping the watcher detaches it.
    _watcher: RecommendedWatcher,
    queue: Arc<ChangeQueue>,
}

pub struct EntryCompiler {
    reconciler: Arc<TreeReconciler>,
    watch: bool,
    events: Arc<dyn SyncEventSink>,
    session: Mutex<Option<WatchSession>>,
    stopped: AtomicBool,
}

impl EntryCompiler {
    pub fn new(reconciler: TreeReconciler, watch: bool, events: Arc<dyn SyncEventSink>) -> Self {
        Self {
            reconciler: Arc::new(reconciler),
            watch,
            events,
            session: Mutex::new(None),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn entry(&self) -> &Entry {
        self.reconciler.entry()
    }

    pub fn reconciler(&self) -> &TreeReconciler {
        &self.reconciler
    }

    pub fn is_watching(&self) -> bool {
        self.lock_session().is_some()
    }

    /// Initial reconciliation, then attach the watcher when watching
    pub fn compile(&self) -> StyleSyncResult<ReconcileReport> {
        let entry = self.reconciler.entry();
        self.events.on_event(SyncEvent::EntryStarted {
            source: entry.source_dir.clone(),
            output: entry.output_dir.clone(),
        });

        if !self.reconciler.file_system().is_dir(&entry.source_dir) {
            return Err(StyleSyncError::DirectoryNotFound {
                path: entry.source_dir.clone(),
            });
        }
        self.ensure_output_dir()?;

        let report = self.reconciler.reconcile()?;
        self.reconciler.prune_manifest();

        if self.watch && !self.stopped.load(Ordering::SeqCst) {
            self.attach_watcher()?;
        }
        Ok(report)
    }

    /// Block until queued watch events have been processed
    pub fn flush(&self) {
        let queue = self.lock_session().as_ref().map(|s| s.queue.clone());
        if let Some(queue) = queue {
            queue.flush();
        }
    }

    /// Detach the watcher and halt the queue; idempotent
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.reconciler.cancel_token().cancel();
        let session = self.lock_session().take();
        if let Some(session) = session {
            session.queue.stop();
            drop(session);
            self.events.on_event(SyncEvent::EntryStopped {
                source: self.entry().source_dir.clone(),
            });
        }
    }

    fn ensure_output_dir(&self) -> StyleSyncResult<()> {
        let fs = self.reconciler.file_system();
        let output = &self.entry().output_dir;
        if fs.is_dir(output) {
            return Ok(());
        }

        let mut last_error = String::new();
        for attempt in 1..=CREATE_DIR_ATTEMPTS {
            match fs.create_dir_all(output) {
                Ok(()) => {
                    self.events.on_event(SyncEvent::DirectoryCreated {
                        path: output.clone(),
                    });
                    return Ok(());
                }
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < CREATE_DIR_ATTEMPTS {
                        thread::sleep(CREATE_DIR_RETRY_DELAY);
                    }
                }
            }
        }

        Err(StyleSyncError::DirectoryCreateFailed {
            path: output.clone(),
            attempts: CREATE_DIR_ATTEMPTS,
            message: last_error,
        })
    }

    fn attach_watcher(&self) -> StyleSyncResult<()> {
        let source = self.entry().source_dir.clone();
        let queue = Arc::new(ChangeQueue::new(
            self.events.clone(),
            self.reconciler.cancel_token().clone(),
        )?);

        let dispatcher = Dispatcher {
            reconciler: self.reconciler.clone(),
            queue: queue.clone(),
            events: self.events.clone(),
            forward_pending: Arc::new(AtomicBool::new(false)),
        };

        let config = Config::default().with_poll_interval(Duration::from_millis(POLL_INTERVAL_MS));
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| dispatcher.on_notify(res),
            config,
        )?;
        watcher.watch(&source, RecursiveMode::Recursive)?;

        self.events.on_event(SyncEvent::WatchStarted { source });
        *self.lock_session() = Some(WatchSession {
            _watcher: watcher,
            queue,
        });
        Ok(())
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<WatchSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for EntryCompiler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Turns watcher callbacks into queued reconciliation actions
struct Dispatcher {
    reconciler: Arc<TreeReconciler>,
    queue: Arc<ChangeQueue>,
    events: Arc<dyn SyncEventSink>,
    // A queued forward pass that has not started yet covers later changes too.
    forward_pending: Arc<AtomicBool>,
}

impl Dispatcher {
    fn on_notify(&self, res: Result<Event, notify::Error>) {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                self.events.on_event(SyncEvent::WatchFailed {
                    source: self.reconciler.entry().source_dir.clone(),
                    error: e.to_string(),
                });
                return;
            }
        };

        let changes = watch::classify(
            self.reconciler.entry(),
            self.reconciler.file_system(),
            &event,
        );
        for (kind, path) in changes {
            self.events.on_event(SyncEvent::ChangeDetected {
                kind,
                path: path.clone(),
            });
            self.enqueue(kind, &path);
        }
    }

    fn enqueue(&self, kind: ChangeKind, path: &Path) {
        let reconciler = self.reconciler.clone();
        match kind {
            ChangeKind::Add | ChangeKind::Change => {
                if self.forward_pending.swap(true, Ordering::SeqCst) {
                    return;
                }
                let pending = self.forward_pending.clone();
                self.queue.handle(kind, path, move || {
                    pending.store(false, Ordering::SeqCst);
                    let report = reconciler.forward_pass()?;
                    reconciler.report_complete(&report);
                    Ok(())
                });
            }
            ChangeKind::Unlink => {
                let source = path.to_path_buf();
                self.queue.handle(kind, path, move || {
                    let mut report = reconciler.remove_source_file(&source)?;
                    report.merge(reconciler.reverse_pass()?);
                    reconciler.report_complete(&report);
                    Ok(())
                });
            }
            ChangeKind::UnlinkDir => {
                let source = path.to_path_buf();
                self.queue.handle(kind, path, move || {
                    let mut report = reconciler.remove_source_dir(&source)?;
                    report.merge(reconciler.reverse_pass()?);
                    reconciler.report_complete(&report);
                    Ok(())
                });
            }
        }
    }
}
