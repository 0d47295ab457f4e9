//! Message log and message parsing

mod message_log;
mod pagination;
mod parser;

pub use message_log::{LogEvent, LogPage, MessageLog};
pub use parser::parse_message;
