use std::collections::VecDeque;

use url::Url;

use crate::domain::DownloadRequest;

/// Instruction to start one worker for a promoted request. The id tags
/// every event the worker emits so signals from a finished worker can be
/// told apart from the active one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartCommand {
    pub worker_id: u64,
    pub href: Url,
}

/// The download currently owned by a running worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDownload {
    pub worker_id: u64,
    pub href: Url,
    pub percent: u32,
}

/// FIFO queue of download requests with at most one active worker.
///
/// The manager is a plain state machine mutated only from the update loop:
/// a new worker is started only from `enqueue` (when idle) or from
/// `on_worker_terminal`, which is what makes two concurrent workers
/// structurally impossible. Each returned `StartCommand` is the caller's
/// cue to actually spawn the worker; the queue holds no history beyond the
/// active and pending items.
#[derive(Debug, Default)]
pub struct DownloadManager {
    pending: VecDeque<DownloadRequest>,
    active: Option<ActiveDownload>,
    next_worker_id: u64,
}

impl DownloadManager {
    /// Append a request; when idle, immediately promote it.
    pub fn enqueue(&mut self, href: Url) -> Option<StartCommand> {
        self.pending.push_back(DownloadRequest { href });
        if self.active.is_none() {
            self.promote()
        } else {
            None
        }
    }

    fn promote(&mut self) -> Option<StartCommand> {
        let request = self.pending.pop_front()?;
        self.next_worker_id += 1;
        let worker_id = self.next_worker_id;
        self.active = Some(ActiveDownload {
            worker_id,
            href: request.href.clone(),
            percent: 0,
        });
        Some(StartCommand {
            worker_id,
            href: request.href,
        })
    }

    /// Record progress for the active worker. Returns false when the event
    /// came from a worker that is no longer active; such stale signals are
    /// discarded rather than applied.
    pub fn on_progress(&mut self, worker_id: u64, percent: u32) -> bool {
        match &mut self.active {
            Some(active) if active.worker_id == worker_id => {
                active.percent = percent;
                true
            }
            _ => {
                log::debug!("discarding stale progress from worker {worker_id}");
                false
            }
        }
    }

    /// Clear the active slot for a terminal event and promote the next
    /// pending request, regardless of whether the worker succeeded. A
    /// terminal event from a stale worker changes nothing.
    pub fn on_worker_terminal(&mut self, worker_id: u64) -> Option<StartCommand> {
        match &self.active {
            Some(active) if active.worker_id == worker_id => {
                self.active = None;
                self.promote()
            }
            _ => None,
        }
    }

    pub fn active(&self) -> Option<&ActiveDownload> {
        self.active.as_ref()
    }

    pub fn pending(&self) -> impl Iterator<Item = &DownloadRequest> {
        self.pending.iter()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.pending.is_empty()
    }
}
