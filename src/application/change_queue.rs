//! Change Queue
//!
//! Serializes filesystem notifications into one-at-a-time reconciliation
//! actions. A single worker thread owns the receiving end of an unbounded
//! channel, so at most one action is ever in flight and actions run in push
//! order.
//!
//! Failed actions are reported and discarded, never retried. `stop()` is
//! terminal: it cancels the shared token, abandons anything still queued and
//! waits for the in-flight action (which observes the token at its next
//! filesystem operation).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crate::domain::ports::{ChangeKind, SyncEvent, SyncEventSink};
use crate::domain::services::CancelToken;
use crate::error::{StyleSyncError, StyleSyncResult};

type Action = Box<dyn FnOnce() -> StyleSyncResult<()> + Send>;

/// One filesystem notification plus the work it triggers
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
    action: Action,
}

impl ChangeEvent {
    pub fn new<F>(kind: ChangeKind, path: impl Into<PathBuf>, action: F) -> Self
    where
        F: FnOnce() -> StyleSyncResult<()> + Send + 'static,
    {
        Self {
            kind,
            path: path.into(),
            action: Box::new(action),
        }
    }

    /// Run the deferred action, consuming the event
    pub fn process(self) -> StyleSyncResult<()> {
        (self.action)()
    }
}

impl std::fmt::Debug for ChangeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeEvent")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

enum Message {
    Event(ChangeEvent),
    Flush(Sender<()>),
}

/// Single-consumer FIFO executor
pub struct ChangeQueue {
    sender: Mutex<Option<Sender<Message>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    pending: Arc<AtomicUsize>,
    cancel: CancelToken,
}

impl ChangeQueue {
    /// Spawn the worker; cancelling `cancel` halts the queue
    pub fn new(events: Arc<dyn SyncEventSink>, cancel: CancelToken) -> StyleSyncResult<Self> {
        let (sender, receiver) = mpsc::channel();
        let pending = Arc::new(AtomicUsize::new(0));

        let worker = {
            let pending = pending.clone();
            let cancel = cancel.clone();
            thread::Builder::new()
                .name("stylesync-queue".to_string())
                .spawn(move || drain(receiver, pending, cancel, events))?
        };

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            pending,
            cancel,
        })
    }

    /// Enqueue an action for `(kind, path)`
    pub fn handle<F>(&self, kind: ChangeKind, path: &Path, action: F)
    where
        F: FnOnce() -> StyleSyncResult<()> + Send + 'static,
    {
        self.push(ChangeEvent::new(kind, path, action));
    }

    /// Append to the tail; silently dropped once stopped
    pub fn push(&self, event: ChangeEvent) {
        if self.cancel.is_cancelled() {
            return;
        }
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = sender.as_ref() {
            self.pending.fetch_add(1, Ordering::SeqCst);
            if sender.send(Message::Event(event)).is_err() {
                self.pending.fetch_sub(1, Ordering::SeqCst);
            }
        }
    }

    /// Block until everything pushed before this call has been processed
    pub fn flush(&self) {
        let (done, wait) = mpsc::channel();
        {
            let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
            match sender.as_ref() {
                Some(sender) if sender.send(Message::Flush(done)).is_ok() => {}
                _ => return,
            }
        }
        let _ = wait.recv();
    }

    /// Events queued or running
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Halt the worker; idempotent
    pub fn stop(&self) {
        self.cancel.cancel();
        // Dropping the sender ends the worker's receive loop.
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            if worker.thread().id() != thread::current().id() {
                let _ = worker.join();
            }
        }
    }
}

impl Drop for ChangeQueue {
    fn drop(&mut self) {
        self.stop();
    }
}

fn drain(
    receiver: Receiver<Message>,
    pending: Arc<AtomicUsize>,
    cancel: CancelToken,
    events: Arc<dyn SyncEventSink>,
) {
    for message in receiver {
        match message {
            Message::Event(event) => {
                if !cancel.is_cancelled() {
                    let kind = event.kind;
                    let path = event.path.clone();
                    match event.process() {
                        Ok(()) | Err(StyleSyncError::Cancelled) => {}
                        Err(e) => events.on_event(SyncEvent::QueueActionFailed {
                            kind,
                            path,
                            error: e.to_string(),
                        }),
                    }
                }
                pending.fetch_sub(1, Ordering::SeqCst);
            }
            Message::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}
