use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use quiz_core::model::{Notice, NoticeKind, NoticeSeverity};

/// Receives user-facing notices. Sinks only display; they never recover.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Forwards notices to the `tracing` subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNoticeSink;

impl NoticeSink for TracingNoticeSink {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            NoticeSeverity::Destructive => warn!(
                kind = ?notice.kind,
                description = %notice.description,
                "{}",
                notice.title
            ),
            NoticeSeverity::Info => info!(
                kind = ?notice.kind,
                description = %notice.description,
                "{}",
                notice.title
            ),
        }
    }
}

/// Delivers each notice to every wrapped sink, in order.
#[derive(Clone, Default)]
pub struct TeeNoticeSink {
    sinks: Vec<Arc<dyn NoticeSink + Send + Sync>>,
}

impl TeeNoticeSink {
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn NoticeSink + Send + Sync>>) -> Self {
        Self { sinks }
    }
}

impl NoticeSink for TeeNoticeSink {
    fn notify(&self, notice: Notice) {
        for sink in &self.sinks {
            sink.notify(notice.clone());
        }
    }
}

/// In-memory notice sink; clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct NoticeLog {
    entries: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Notice> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn count(&self, kind: NoticeKind) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }
}

impl NoticeSink for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
