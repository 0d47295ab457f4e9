//! Message pagination utilities
//!
//! Helper functions for paginating message collections.

use crate::types::messages::Message;

/// Paginate messages based on offset and length
///
/// # Pagination Modes
/// - offset >= 0: Start from position N, take `length` messages
/// - offset < 0: Tail mode - take last |offset| messages
pub(crate) fn paginate_messages(messages: &[Message], offset: i64, length: usize) -> Vec<Message> {
    if offset >= 0 {
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        messages.iter().skip(start).take(length).cloned().collect()
    } else {
        let tail_count = usize::try_from(offset.unsigned_abs()).unwrap_or(usize::MAX);
        let start = messages.len().saturating_sub(tail_count);
        messages[start..].to_vec()
    }
}

/// Calculate if there are more messages available after a page
pub(crate) fn calculate_has_more(offset: i64, messages_returned: usize, total_messages: usize) -> bool {
    if offset >= 0 {
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        start.saturating_add(messages_returned) < total_messages
    } else {
        false
    }
}
