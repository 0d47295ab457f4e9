//! Type definitions for the agent session controller
//!
//! - [`identifiers`] - Type-safe wrappers (`SessionId`, `ApiKey`)
//! - [`messages`] - Log message and message kind
//! - [`options`] - Session config and controller options
//! - [`status`] - Lifecycle, status and outcome types

pub mod identifiers;
pub mod messages;
pub mod options;
pub mod status;

// Re-export commonly used types
pub use identifiers::{ApiKey, SessionId};
pub use messages::{Message, MessageKind};
pub use options::{ControllerOptions, ControllerOptionsBuilder, SessionConfig};
pub use status::{SessionOutcome, SessionState, SessionStatus, SessionSummary};
