//! Worker boundary
//!
//! The worker performs the actual autonomous-task work. The session run loop
//! calls [`Worker::perform_unit`] repeatedly until the worker reports
//! `is_done`, a stop is requested, or an error escapes.
//!
//! Workers are responsible for serializing their own output within a unit:
//! the messages of a [`UnitOutput`] are delivered in vector order.

mod scripted;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::messages::Message;
use crate::types::options::SessionConfig;

pub use scripted::{ScriptStep, ScriptedWorker, parse_script};

/// Result of one unit of work
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitOutput {
    /// Messages produced by the unit, in emission order
    pub messages: Vec<Message>,
    /// Goal satisfied; no further unit is requested
    pub is_done: bool,
}

impl UnitOutput {
    /// Unit produced messages and more work remains
    #[must_use]
    pub const fn continue_with(messages: Vec<Message>) -> Self {
        Self {
            messages,
            is_done: false,
        }
    }

    /// Unit produced messages and the goal is done
    #[must_use]
    pub const fn done(messages: Vec<Message>) -> Self {
        Self {
            messages,
            is_done: true,
        }
    }
}

/// Autonomous-task execution capability consumed by the run loop
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// Called once when a session's run loop begins, before the first unit
    ///
    /// An error here is terminal for the session, like a failed unit.
    async fn on_session_start(&self, _config: &SessionConfig) -> Result<()> {
        Ok(())
    }

    /// Perform one unit of work
    ///
    /// `prior_messages` holds every message the session emitted so far, in order.
    ///
    /// # Errors
    /// Any error is terminal for the session; retries belong inside the worker.
    async fn perform_unit(
        &self,
        config: &SessionConfig,
        prior_messages: &[Message],
    ) -> Result<UnitOutput>;
}
