//! Agent session management
//!
//! Provides `SessionController` for starting, observing and stopping a single
//! autonomous agent session at a time.
//!
//! # Module Structure
//!
//! - `controller` - `SessionController` with the public intents and observables
//! - `session` - `AgentSession` state machine
//! - `callbacks` - Session-to-owner callback protocol
//! - `background` - Run loop task spawning

mod background;
mod callbacks;
mod controller;
mod session;

pub use callbacks::SessionCallbacks;
pub use controller::SessionController;
pub use session::{AgentSession, RunLimits};
