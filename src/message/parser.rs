//! Message parser for worker output

use crate::error::{Result, SessionError};
use crate::types::messages::Message;

/// Parse a JSON value into a typed Message
///
/// Expects `{"type": "<kind>", "value": "...", "metadata": ...}` with
/// `metadata` optional.
///
/// # Errors
/// Returns `SessionError::MessageParse` if the JSON is not a valid Message
pub fn parse_message(data: serde_json::Value) -> Result<Message> {
    serde_json::from_value(data.clone()).map_err(|e| {
        SessionError::message_parse(format!("Failed to parse message: {e}"), Some(data))
    })
}
