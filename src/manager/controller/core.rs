//! Core session controller structure and lifecycle management
//!
//! Provides the `SessionController` struct with initialization, idle waiting
//! and shutdown.

use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::super::session::{AgentSession, RunLimits};
use crate::message::MessageLog;
use crate::types::options::ControllerOptions;
use crate::types::status::{SessionOutcome, SessionStatus};
use crate::worker::Worker;

// ============================================================================
// CONTROLLER STATE
// ============================================================================

/// State mutated only by the controller and its session callbacks
pub(crate) struct ControllerState {
    /// Trace of the current or last session
    pub log: MessageLog,
    /// Zero or one session
    pub active: Option<AgentSession>,
    /// Stop flag handed to the next session; replaced when a session ends
    pub stop: CancellationToken,
    /// Stop requested for the active session
    pub stop_requested: bool,
    /// How the previous session ended
    pub last_outcome: Option<SessionOutcome>,
}

impl ControllerState {
    /// Status derived from the session reference and stop request
    pub fn status(&self) -> SessionStatus {
        match (&self.active, self.stop_requested) {
            (None, _) => SessionStatus::NoSession,
            (Some(_), false) => SessionStatus::Running,
            (Some(_), true) => SessionStatus::StoppingRequested,
        }
    }
}

pub(crate) struct ControllerInner {
    pub state: Mutex<ControllerState>,
    pub status_tx: watch::Sender<SessionStatus>,
    pub worker: Arc<dyn Worker>,
    pub options: ControllerOptions,
}

impl ControllerInner {
    pub fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock()
    }

    /// Push the current status to watchers; call with the state lock held
    pub fn publish_status(&self, state: &ControllerState) {
        self.status_tx.send_replace(state.status());
    }

    pub fn limits_for(&self, has_api_key: bool) -> RunLimits {
        RunLimits {
            unit_cap: self.options.unit_cap(has_api_key),
            unit_delay: self.options.unit_delay,
        }
    }
}

impl Drop for ControllerInner {
    fn drop(&mut self) {
        // A run loop outliving its controller stops at the next unit boundary
        self.state.get_mut().stop.cancel();
    }
}

// ============================================================================
// SESSION CONTROLLER CORE
// ============================================================================

/// Owner of zero-or-one agent session and its message log
///
/// The `SessionController` mediates user intents and exposes observables:
/// - Intents: [`start_new_session`](Self::start_new_session), [`request_stop`](Self::request_stop)
/// - Observables: the message log and the [`SessionStatus`]
///
/// It is the single writer of the log. The active session reports through
/// callbacks and never mutates controller state directly.
///
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct SessionController {
    pub(crate) inner: Arc<ControllerInner>,
}

impl SessionController {
    /// Create a controller driving sessions with `worker`
    #[must_use]
    pub fn new(worker: Arc<dyn Worker>, options: ControllerOptions) -> Self {
        let state = ControllerState {
            log: MessageLog::new(options.log_channel_capacity),
            active: None,
            stop: CancellationToken::new(),
            stop_requested: false,
            last_outcome: None,
        };
        let (status_tx, _) = watch::channel(SessionStatus::NoSession);

        Self {
            inner: Arc::new(ControllerInner {
                state: Mutex::new(state),
                status_tx,
                worker,
                options,
            }),
        }
    }

    /// Options this controller was built with
    #[must_use]
    pub fn options(&self) -> &ControllerOptions {
        &self.inner.options
    }

    /// Wait until no session exists
    pub async fn wait_idle(&self) {
        let mut rx = self.inner.status_tx.subscribe();
        // The sender lives as long as `self`
        let _ = rx.wait_for(|status| *status == SessionStatus::NoSession).await;
    }

    /// Gracefully shut down the controller
    ///
    /// Requests a stop of the active session, if any, and waits for its run
    /// loop to finish the in-flight unit and exit.
    pub async fn shutdown(&self) {
        log::info!("Shutting down SessionController...");
        if self.request_stop() {
            self.wait_idle().await;
        }
        log::info!("SessionController shutdown complete");
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("SessionController")
            .field("status", &state.status())
            .field("active", &state.active)
            .field("log_len", &state.log.len())
            .field("options", &self.inner.options)
            .finish()
    }
}
