//! Error types for the agent session controller

use thiserror::Error;

/// Main error type for the agent session controller
#[derive(Error, Debug)]
pub enum SessionError {
    /// Session name or goal missing at construction
    #[error("Invalid session configuration: {0}")]
    InvalidConfiguration(String),

    /// Start requested while another session is still active
    #[error("Agent session {0} is already running")]
    AlreadyRunning(String),

    /// Error escaping a worker unit of work
    ///
    /// Never returned from controller intents; the run loop records it as an
    /// error message and terminates the session.
    #[error("Worker failure: {0}")]
    WorkerFailure(String),

    /// Invalid controller options (environment or builder input)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Message parse error with optional raw data
    #[error("Message parse error: {message}")]
    MessageParse {
        /// Error message
        message: String,
        /// Raw message data that failed to parse
        data: Option<serde_json::Value>,
    },

    /// Key-value store error
    #[error("Store error: {0}")]
    Store(String),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for session controller operations
pub type Result<T> = std::result::Result<T, SessionError>;

impl SessionError {
    /// Create an invalid session configuration error
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create an already running error for the given active session
    pub fn already_running(session_id: impl Into<String>) -> Self {
        Self::AlreadyRunning(session_id.into())
    }

    /// Create a worker failure error
    pub fn worker_failure(msg: impl Into<String>) -> Self {
        Self::WorkerFailure(msg.into())
    }

    /// Create an invalid options error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a message parse error
    pub fn message_parse(msg: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self::MessageParse {
            message: msg.into(),
            data,
        }
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// True for errors a caller of the controller intents can observe
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_) | Self::AlreadyRunning(_))
    }
}
