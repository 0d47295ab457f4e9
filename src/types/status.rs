//! Session lifecycle and status types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::SessionId;

/// State of an existing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Run loop is performing units of work
    Running,
    /// Stop requested; the run loop exits at the next unit boundary
    Stopping,
}

/// Controller status exposed to presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No session exists; start is allowed
    NoSession,
    /// A session is running
    Running,
    /// A session exists and a stop has been requested
    StoppingRequested,
}

impl SessionStatus {
    /// Whether the start affordance should be enabled
    #[must_use]
    pub const fn can_start(self) -> bool {
        matches!(self, Self::NoSession)
    }

    /// Whether the stop affordance should be enabled
    #[must_use]
    pub const fn can_stop(self) -> bool {
        !matches!(self, Self::NoSession)
    }
}

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Worker reported the goal done
    Completed,
    /// Stop flag observed at a unit boundary
    Stopped,
    /// Configured iteration cap reached
    LoopLimitReached,
    /// Worker failed; the error text was appended to the log
    Failed(String),
}

/// Snapshot of the active session for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Session identifier
    pub id: SessionId,
    /// Agent name
    pub name: String,
    /// Agent goal
    pub goal: String,
    /// Current lifecycle state
    pub state: SessionState,
    /// Units of work finished so far
    pub units_completed: u32,
    /// When the session was created
    pub started_at: DateTime<Utc>,
}
