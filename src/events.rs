//! Structured progress reporting.
//!
//! Workers never talk to the presentation layer directly. They send
//! [`BatchEvent`]s to the orchestrator, which forwards them one at a time to
//! an [`EventSink`] on the thread that started the batch.

use crate::task::TaskOutcome;
use crossbeam_channel::Sender;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Candidates have been discovered; `total` outcomes will follow.
    Started { total: usize },
    /// Informational progress line.
    Progress { message: String },
    /// A candidate was skipped or hit a soft issue.
    Skip { source: PathBuf, message: String },
    /// A candidate failed, or its original could not be removed.
    Error { source: PathBuf, message: String },
    /// Terminal state of one candidate.
    Outcome(TaskOutcome),
    Finished {
        processed: usize,
        skipped: usize,
        failed: usize,
    },
}

impl BatchEvent {
    pub fn progress(message: impl Into<String>) -> Self {
        BatchEvent::Progress {
            message: message.into(),
        }
    }

    pub fn skip(source: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        BatchEvent::Skip {
            source: source.into(),
            message: message.into(),
        }
    }

    pub fn error(source: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        BatchEvent::Error {
            source: source.into(),
            message: message.into(),
        }
    }

    /// Human-readable line for log-style consumers; `None` for `Outcome`.
    pub fn message(&self) -> Option<String> {
        match self {
            BatchEvent::Started { total } => Some(format!("Found {} image files to process", total)),
            BatchEvent::Progress { message }
            | BatchEvent::Skip { message, .. }
            | BatchEvent::Error { message, .. } => Some(message.clone()),
            BatchEvent::Outcome(_) => None,
            BatchEvent::Finished {
                processed,
                skipped,
                failed,
            } => Some(format!(
                "Finished: {} processed, {} skipped, {} failed",
                processed, skipped, failed
            )),
        }
    }
}

/// Receives batch events, always from a single thread.
pub trait EventSink {
    fn emit(&mut self, event: BatchEvent);
}

impl EventSink for Sender<BatchEvent> {
    fn emit(&mut self, event: BatchEvent) {
        // A dropped receiver means nobody is listening any more.
        let _ = self.send(event);
    }
}

impl EventSink for Vec<BatchEvent> {
    fn emit(&mut self, event: BatchEvent) {
        self.push(event);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: BatchEvent) {}
}

/// Adapts the classic log/warn/error callback triple to an [`EventSink`].
pub struct Callbacks<L, W, E> {
    on_log: L,
    on_warn: W,
    on_error: E,
}

impl<L, W, E> Callbacks<L, W, E>
where
    L: FnMut(&str),
    W: FnMut(&str),
    E: FnMut(&str),
{
    pub fn new(on_log: L, on_warn: W, on_error: E) -> Self {
        Self {
            on_log,
            on_warn,
            on_error,
        }
    }
}

impl<L, W, E> EventSink for Callbacks<L, W, E>
where
    L: FnMut(&str),
    W: FnMut(&str),
    E: FnMut(&str),
{
    fn emit(&mut self, event: BatchEvent) {
        let Some(message) = event.message() else {
            return;
        };
        match event {
            BatchEvent::Skip { .. } => (self.on_warn)(&message),
            BatchEvent::Error { .. } => (self.on_error)(&message),
            _ => (self.on_log)(&message),
        }
    }
}
