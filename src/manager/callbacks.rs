//! Session-to-owner callback protocol
//!
//! An [`AgentSession`](super::AgentSession) never touches its owner's state.
//! Everything it has to say goes through these two methods.

use crate::types::messages::Message;
use crate::types::status::SessionOutcome;

/// Receiver of a session's messages and completion
///
/// Both methods are invoked from the session's run loop task, one call at a
/// time, so implementations see messages in emission order. They must not
/// block on the run loop itself.
pub trait SessionCallbacks: Send + Sync + 'static {
    /// One message produced by the session
    fn on_message(&self, message: Message);

    /// The run loop exited; called exactly once per started session
    fn on_complete(&self, outcome: SessionOutcome);
}
