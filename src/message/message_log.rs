//! Append-only ordered message log
//!
//! The log is owned by the session controller, which is its only writer.
//! Observers subscribe to a broadcast of [`LogEvent`]s and see growth-only
//! semantics between two `Cleared` events.

use tokio::sync::broadcast;

use super::pagination::{calculate_has_more, paginate_messages};
use crate::types::messages::Message;
use crate::types::options::DEFAULT_LOG_CHANNEL_CAPACITY;

/// Change notification emitted on every log mutation
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    /// A message was appended at `index`
    Appended {
        /// Position of the new message
        index: usize,
        /// The appended message
        message: Message,
    },
    /// The log was emptied ahead of a new session
    Cleared,
}

/// One page of log entries
#[derive(Debug, Clone, PartialEq)]
pub struct LogPage {
    /// Messages in this page
    pub messages: Vec<Message>,
    /// Total messages in the log
    pub total: usize,
    /// More messages available after this page
    pub has_more: bool,
}

/// Ordered sequence of session messages
#[derive(Debug)]
pub struct MessageLog {
    entries: Vec<Message>,
    events: broadcast::Sender<LogEvent>,
}

impl MessageLog {
    /// Create an empty log with the given observer buffer
    #[must_use]
    pub fn new(channel_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            entries: Vec::new(),
            events,
        }
    }

    /// Add a message to the end of the log
    pub fn append(&mut self, message: Message) {
        let index = self.entries.len();
        self.entries.push(message.clone());
        // No subscribers is fine
        let _ = self.events.send(LogEvent::Appended { index, message });
    }

    /// Empty the log
    pub fn clear(&mut self) {
        self.entries.clear();
        let _ = self.events.send(LogEvent::Cleared);
    }

    /// Number of messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the log holds no messages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the messages in order
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }

    /// Most recent message
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    /// Owned copy of the messages in order
    #[must_use]
    pub fn snapshot(&self) -> Vec<Message> {
        self.entries.clone()
    }

    /// Page through the log
    ///
    /// - offset >= 0: start at message N, take `length` messages
    /// - offset < 0: tail mode, take the last |offset| messages
    #[must_use]
    pub fn page(&self, offset: i64, length: usize) -> LogPage {
        let messages = paginate_messages(&self.entries, offset, length);
        let total = self.entries.len();
        let has_more = calculate_has_more(offset, messages.len(), total);
        LogPage {
            messages,
            total,
            has_more,
        }
    }

    /// Subscribe to change notifications
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
        self.events.subscribe()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_grows_by_one() {
        let mut log = MessageLog::default();
        for i in 0..5 {
            let before = log.len();
            log.append(Message::info(format!("m{i}")));
            assert_eq!(log.len(), before + 1);
        }
        assert_eq!(log.last().map(Message::value), Some("m4"));
    }

    #[test]
    fn clear_empties() {
        let mut log = MessageLog::default();
        log.append(Message::goal("g"));
        log.clear();
        assert_eq!(log.len(), 0);
        assert!(log.is_empty());
        assert!(log.snapshot().is_empty());
    }

    #[test]
    fn observers_see_every_mutation_in_order() {
        let mut log = MessageLog::new(8);
        let mut rx = log.subscribe();
        log.append(Message::goal("g"));
        log.append(Message::task("t"));
        log.clear();

        assert_eq!(
            rx.try_recv().unwrap(),
            LogEvent::Appended {
                index: 0,
                message: Message::goal("g")
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            LogEvent::Appended {
                index: 1,
                message: Message::task("t")
            }
        );
        assert_eq!(rx.try_recv().unwrap(), LogEvent::Cleared);
    }

    #[test]
    fn page_head_and_tail() {
        let mut log = MessageLog::default();
        for i in 0..5 {
            log.append(Message::info(i.to_string()));
        }

        let head = log.page(1, 2);
        let values: Vec<_> = head.messages.iter().map(Message::value).collect();
        assert_eq!(values, ["1", "2"]);
        assert!(head.has_more);

        let tail = log.page(-2, 0);
        let values: Vec<_> = tail.messages.iter().map(Message::value).collect();
        assert_eq!(values, ["3", "4"]);
        assert!(!tail.has_more);
        assert_eq!(tail.total, 5);
    }
}
