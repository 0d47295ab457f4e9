//! Status and log queries for presentation

use tokio::sync::{broadcast, watch};

use super::core::SessionController;
use crate::message::{LogEvent, LogPage};
use crate::types::messages::Message;
use crate::types::status::{SessionOutcome, SessionStatus, SessionSummary};

impl SessionController {
    /// Current controller status
    #[must_use]
    pub fn current_status(&self) -> SessionStatus {
        self.inner.lock().status()
    }

    /// Receiver notified on every status change
    #[must_use]
    pub fn watch_status(&self) -> watch::Receiver<SessionStatus> {
        self.inner.status_tx.subscribe()
    }

    /// Snapshot of the active session, if any
    #[must_use]
    pub fn active_session(&self) -> Option<SessionSummary> {
        self.inner.lock().active.as_ref().map(|session| session.summary())
    }

    /// How the most recent session ended
    #[must_use]
    pub fn last_outcome(&self) -> Option<SessionOutcome> {
        self.inner.lock().last_outcome.clone()
    }

    /// Copy of the message log in order
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.inner.lock().log.snapshot()
    }

    /// Number of messages in the log
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.inner.lock().log.len()
    }

    /// Page through the log (negative offset reads the tail)
    #[must_use]
    pub fn messages_page(&self, offset: i64, length: usize) -> LogPage {
        self.inner.lock().log.page(offset, length)
    }

    /// Subscribe to log change notifications
    #[must_use]
    pub fn subscribe_log(&self) -> broadcast::Receiver<LogEvent> {
        self.inner.lock().log.subscribe()
    }
}
