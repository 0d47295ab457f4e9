//! Message-related type definitions
//!
//! A [`Message`] is one immutable entry in the observable trace of a session.
//! Insertion order is the chronological order of the trace.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Message Types
// ============================================================================

/// Kind of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Informational output
    Info,
    /// Non-fatal warning
    Warning,
    /// Error recorded in the trace
    Error,
    /// A task the agent added to its plan
    Task,
    /// The goal the agent is pursuing
    Goal,
    /// Controller or run loop notice
    System,
    /// Agent is working on the next step
    Thinking,
    /// Result of executing a task
    Action,
}

impl MessageKind {
    /// Lowercase label used in rendered output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Task => "task",
            Self::Goal => "goal",
            Self::System => "system",
            Self::Thinking => "thinking",
            Self::Action => "action",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the session trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message kind
    #[serde(rename = "type")]
    kind: MessageKind,
    /// Message text
    value: String,
    /// Optional structured metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<serde_json::Value>,
}

impl Message {
    /// Create a message
    pub fn new(kind: MessageKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            metadata: None,
        }
    }

    /// Attach metadata, consuming the message
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Create a goal message
    pub fn goal(value: impl Into<String>) -> Self {
        Self::new(MessageKind::Goal, value)
    }

    /// Create a task message
    pub fn task(value: impl Into<String>) -> Self {
        Self::new(MessageKind::Task, value)
    }

    /// Create an info message
    pub fn info(value: impl Into<String>) -> Self {
        Self::new(MessageKind::Info, value)
    }

    /// Create a system message
    pub fn system(value: impl Into<String>) -> Self {
        Self::new(MessageKind::System, value)
    }

    /// Create an error message
    pub fn error(value: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, value)
    }

    /// Message kind
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Message text
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Optional metadata
    #[must_use]
    pub const fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_kind_as_type_field() {
        let msg = Message::goal("Write a poem");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value, json!({"type": "goal", "value": "Write a poem"}));
    }

    #[test]
    fn display_includes_kind() {
        let msg = Message::task("Draft stanza 1").with_metadata(json!({"n": 1}));
        assert_eq!(msg.to_string(), "[task] Draft stanza 1");
        assert_eq!(msg.metadata(), Some(&json!({"n": 1})));
    }
}
