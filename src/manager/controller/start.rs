//! Session start intent
//!
//! Creates the session, wires its callbacks back into the controller and
//! spawns the run loop.

use std::sync::{Arc, Weak};
use tokio_util::sync::CancellationToken;

use super::super::callbacks::SessionCallbacks;
use super::super::session::AgentSession;
use super::core::{ControllerInner, SessionController};
use crate::error::{Result, SessionError};
use crate::types::identifiers::{ApiKey, SessionId};
use crate::types::messages::Message;
use crate::types::options::SessionConfig;
use crate::types::status::SessionOutcome;

impl SessionController {
    /// Start a new agent session
    ///
    /// Clears the log, creates the session and spawns its run loop. Returns the
    /// new session's id. Identical name and goal to a previous session still
    /// yields a fresh, independent session.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// - `SessionError::AlreadyRunning` if a session exists; session and log are untouched
    /// - `SessionError::InvalidConfiguration` if name or goal is empty; nothing is created
    pub fn start_new_session(
        &self,
        name: impl Into<String>,
        goal: impl Into<String>,
        api_key: Option<ApiKey>,
    ) -> Result<SessionId> {
        let mut state = self.inner.lock();

        if let Some(active) = state.active.as_ref() {
            log::warn!("Start rejected: session {} is still active", active.id());
            return Err(SessionError::already_running(active.id().as_str()));
        }

        let config = SessionConfig::new(name, goal, api_key);
        let limits = self.inner.limits_for(config.api_key.is_some());
        let mut session = AgentSession::new(config, state.stop.clone()).inspect_err(|e| {
            log::warn!("Start rejected: {e}");
        })?;
        let session_id = session.id().clone();

        state.log.clear();
        state.stop_requested = false;

        let callbacks = Arc::new(ControllerCallbacks {
            inner: Arc::downgrade(&self.inner),
            session_id: session_id.clone(),
        });
        session.start(Arc::clone(&self.inner.worker), limits, callbacks)?;

        // The run loop cannot deliver anything before the lock is released
        state.active = Some(session);
        self.inner.publish_status(&state);

        Ok(session_id)
    }
}

/// Callbacks binding one session to its controller
///
/// Holds a weak reference so a dropped controller does not outlive its
/// handles through a still-running run loop.
struct ControllerCallbacks {
    inner: Weak<ControllerInner>,
    session_id: SessionId,
}

impl ControllerCallbacks {
    fn is_current(&self, active: Option<&AgentSession>) -> bool {
        active.is_some_and(|session| *session.id() == self.session_id)
    }
}

impl SessionCallbacks for ControllerCallbacks {
    fn on_message(&self, message: Message) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let mut state = inner.lock();
        // Always true: a new session starts only after this one's on_complete
        if !self.is_current(state.active.as_ref()) {
            log::debug!("[{}] Dropping message from stale session", self.session_id);
            return;
        }
        state.log.append(message);
    }

    fn on_complete(&self, outcome: SessionOutcome) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let mut state = inner.lock();
        // Same invariant as on_message: on_complete is the session's last call
        if !self.is_current(state.active.as_ref()) {
            log::debug!("[{}] Ignoring completion of stale session", self.session_id);
            return;
        }

        state.active = None;
        state.stop = CancellationToken::new();
        state.stop_requested = false;
        state.last_outcome = Some(outcome);
        inner.publish_status(&state);
    }
}
