//! Agent session state machine
//!
//! A session is created `Running`, may move to `Stopping` once, and leaves
//! existence when its run loop reports completion. It never goes back to
//! `Running`.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::background::{RunLoopContext, spawn_run_loop};
use super::callbacks::SessionCallbacks;
use crate::error::{Result, SessionError};
use crate::types::identifiers::SessionId;
use crate::types::options::SessionConfig;
use crate::types::status::{SessionState, SessionSummary};
use crate::worker::Worker;

/// Run loop limits applied to one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunLimits {
    /// Maximum units of work (`None` = unlimited)
    pub unit_cap: Option<u32>,
    /// Pause between units
    pub unit_delay: Duration,
}

/// One autonomous run wrapping a worker
pub struct AgentSession {
    id: SessionId,
    config: SessionConfig,
    stop: CancellationToken,
    state: Arc<Mutex<SessionState>>,
    units_completed: Arc<AtomicU32>,
    finished: Arc<AtomicBool>,
    started_at: DateTime<Utc>,
    join_handle: Option<JoinHandle<()>>,
}

impl AgentSession {
    /// Create a session observing `stop` as its cooperative stop flag
    ///
    /// # Errors
    /// Returns `SessionError::InvalidConfiguration` if name or goal is empty
    pub fn new(config: SessionConfig, stop: CancellationToken) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            id: SessionId::generate(),
            config,
            stop,
            state: Arc::new(Mutex::new(SessionState::Running)),
            units_completed: Arc::new(AtomicU32::new(0)),
            finished: Arc::new(AtomicBool::new(false)),
            started_at: Utc::now(),
            join_handle: None,
        })
    }

    /// Spawn the run loop
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Returns `SessionError::AlreadyRunning` if the session was already started
    pub fn start(
        &mut self,
        worker: Arc<dyn Worker>,
        limits: RunLimits,
        callbacks: Arc<dyn SessionCallbacks>,
    ) -> Result<()> {
        if self.join_handle.is_some() {
            return Err(SessionError::already_running(self.id.as_str()));
        }

        log::info!(
            "[{}] Starting agent '{}' with goal: {}",
            self.id,
            self.config.name,
            self.config.goal
        );

        let ctx = RunLoopContext {
            session_id: self.id.clone(),
            config: self.config.clone(),
            worker,
            callbacks,
            stop: self.stop.clone(),
            limits,
            units_completed: Arc::clone(&self.units_completed),
            finished: Arc::clone(&self.finished),
        };
        self.join_handle = Some(spawn_run_loop(ctx));
        Ok(())
    }

    /// Request a cooperative stop
    ///
    /// Idempotent. In-flight work is not interrupted; no new unit starts once
    /// the run loop observes the flag.
    pub fn stop(&self) {
        if self.finished.load(Ordering::SeqCst) {
            return;
        }

        let mut state = self.state.lock();
        if *state == SessionState::Running {
            log::info!("[{}] Stop requested", self.id);
            *state = SessionState::Stopping;
        }
        self.stop.cancel();
    }

    /// Session identifier
    #[must_use]
    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    /// Session configuration
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Units of work finished so far
    #[must_use]
    pub fn units_completed(&self) -> u32 {
        self.units_completed.load(Ordering::SeqCst)
    }

    /// Creation time
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whether the run loop has exited
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Presentation snapshot
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            name: self.config.name.clone(),
            goal: self.config.goal.clone(),
            state: self.state(),
            units_completed: self.units_completed(),
            started_at: self.started_at,
        }
    }
}

impl std::fmt::Debug for AgentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSession")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("state", &self.state())
            .field("units_completed", &self.units_completed())
            .field("started", &self.join_handle.is_some())
            .finish()
    }
}
