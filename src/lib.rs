//! # Agent Session Controller
//!
//! Configure and launch a single long-running autonomous agent run, observe its
//! progress as a growing ordered message log, and request cooperative
//! cancellation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use kodegen_agent_session::{
//!     ControllerOptions, Message, ScriptStep, ScriptedWorker, SessionController,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let worker = Arc::new(ScriptedWorker::new(vec![
//!         ScriptStep::emit(vec![Message::goal("Write a poem")]),
//!         ScriptStep::finish(vec![Message::task("Draft stanza 1")]),
//!     ]));
//!     let controller = SessionController::new(worker, ControllerOptions::default());
//!
//!     controller.start_new_session("Bot", "Write a poem", None)?;
//!     controller.wait_idle().await;
//!
//!     for message in controller.messages() {
//!         log::info!("{message}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//!   NoSession ──start_new_session──▶ Running ──request_stop──▶ StoppingRequested
//!       ▲                               │                            │
//!       └──────── run loop completes ◀──┴────────────────────────────┘
//! ```
//!
//! - At most one session exists per [`SessionController`]; a second start is
//!   rejected with [`SessionError::AlreadyRunning`].
//! - The run loop checks the stop flag only between units of work. A unit in
//!   flight always finishes and its messages are logged.
//! - Worker errors never reach the caller: they become one `Error` message in
//!   the log and end the session.
//!
//! ## Architecture
//!
//! - [`types`]: Messages, identifiers, options and status types
//! - [`message`]: The append-only [`MessageLog`] and message parsing
//! - [`worker`]: The [`Worker`] boundary and a deterministic [`ScriptedWorker`]
//! - [`manager`]: [`AgentSession`] state machine, run loop and [`SessionController`]
//! - [`onboarding`]: First-run dialog gate over an injected key-value store
//! - [`error`]: Error types and handling
//!
//! ## Configuration
//!
//! [`ControllerOptions`] is built with a builder or read from the environment:
//!
//! - `KODEGEN_AGENT_MAX_UNITS` - unit cap for sessions without an API key
//! - `KODEGEN_AGENT_MAX_UNITS_WITH_KEY` - unit cap for sessions with an API key
//! - `KODEGEN_AGENT_UNIT_DELAY_MS` - pause between units
//!
//! ## Logging
//!
//! The crate logs through the `log` facade. Binaries and tests install
//! `env_logger`; set `RUST_LOG=kodegen_agent_session=debug` for per-unit output.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod manager;
pub mod message;
pub mod onboarding;
pub mod types;
pub mod worker;

// Re-export commonly used types for external API
pub use error::{Result, SessionError};
pub use manager::{AgentSession, RunLimits, SessionCallbacks, SessionController};
pub use message::{LogEvent, LogPage, MessageLog, parse_message};
pub use onboarding::{Dialog, FileStore, KeyValueStore, MemoryStore, OnboardingGate};
pub use types::identifiers::{ApiKey, SessionId};
pub use types::messages::{Message, MessageKind};
pub use types::options::{ControllerOptions, ControllerOptionsBuilder, SessionConfig};
pub use types::status::{SessionOutcome, SessionState, SessionStatus, SessionSummary};
pub use worker::{ScriptStep, ScriptedWorker, UnitOutput, Worker, parse_script};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
