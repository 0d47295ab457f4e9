//! Deterministic scripted worker
//!
//! Replays a fixed list of steps, one per unit of work. Useful for demos and
//! tests where the real autonomous worker is not wanted.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{UnitOutput, Worker};
use crate::error::{Result, SessionError};
use crate::message::parse_message;
use crate::types::messages::{Message, MessageKind};
use crate::types::options::SessionConfig;

/// One scripted unit of work
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptStep {
    /// Messages the unit produces
    pub messages: Vec<Message>,
    /// Report the goal done after this unit
    pub done: bool,
    /// Fail the unit with this error instead of producing messages
    pub fail: Option<String>,
    /// Simulated work time
    pub delay: Duration,
}

impl ScriptStep {
    /// Step producing messages, more work remaining
    #[must_use]
    pub fn emit(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Step producing messages and finishing the goal
    #[must_use]
    pub fn finish(messages: Vec<Message>) -> Self {
        Self {
            messages,
            done: true,
            ..Self::default()
        }
    }

    /// Step failing with an error
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            fail: Some(error.into()),
            ..Self::default()
        }
    }

    /// Add simulated work time
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStep {
    #[serde(default)]
    messages: Vec<serde_json::Value>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    fail: Option<String>,
    #[serde(default)]
    delay_ms: u64,
}

/// Parse a JSON script: an array of steps
///
/// ```json
/// [
///   {"messages": [{"type": "goal", "value": "Write a poem"}]},
///   {"messages": [{"type": "task", "value": "Draft stanza 1"}], "done": true, "delay_ms": 250}
/// ]
/// ```
///
/// # Errors
/// Returns `SessionError::Json` for malformed JSON and
/// `SessionError::MessageParse` for invalid messages
pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>> {
    let raw: Vec<RawStep> = serde_json::from_str(json)?;
    raw.into_iter()
        .map(|step| {
            let messages = step
                .messages
                .into_iter()
                .map(parse_message)
                .collect::<Result<Vec<_>>>()?;
            Ok(ScriptStep {
                messages,
                done: step.done,
                fail: step.fail,
                delay: Duration::from_millis(step.delay_ms),
            })
        })
        .collect()
}

/// Worker replaying [`ScriptStep`]s in order
///
/// The cursor rewinds at every session start. Once the script is exhausted the
/// worker reports the goal done.
#[derive(Debug)]
pub struct ScriptedWorker {
    steps: Vec<ScriptStep>,
    cursor: AtomicUsize,
    units_performed: AtomicUsize,
}

impl ScriptedWorker {
    /// Create a worker from steps
    #[must_use]
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps,
            cursor: AtomicUsize::new(0),
            units_performed: AtomicUsize::new(0),
        }
    }

    /// Create a worker from a JSON script
    ///
    /// # Errors
    /// See [`parse_script`]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(parse_script(json)?))
    }

    /// Built-in script used when no script is supplied
    #[must_use]
    pub fn demo(goal: &str) -> Self {
        let unit = Duration::from_millis(500);
        Self::new(vec![
            ScriptStep::emit(vec![
                Message::goal(goal),
                Message::new(MessageKind::Thinking, "Thinking..."),
            ])
            .with_delay(unit),
            ScriptStep::emit(vec![
                Message::task("Research the goal"),
                Message::task("Outline an approach"),
            ])
            .with_delay(unit),
            ScriptStep::emit(vec![Message::new(
                MessageKind::Action,
                "Executing \"Research the goal\"",
            )])
            .with_delay(unit),
            ScriptStep::finish(vec![Message::new(
                MessageKind::Action,
                "Executing \"Outline an approach\"",
            )])
            .with_delay(unit),
        ])
    }

    /// Units performed over the worker's lifetime
    #[must_use]
    pub fn units_performed(&self) -> usize {
        self.units_performed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Worker for ScriptedWorker {
    async fn on_session_start(&self, _config: &SessionConfig) -> Result<()> {
        self.cursor.store(0, Ordering::SeqCst);
        Ok(())
    }

    async fn perform_unit(
        &self,
        _config: &SessionConfig,
        _prior_messages: &[Message],
    ) -> Result<UnitOutput> {
        self.units_performed.fetch_add(1, Ordering::SeqCst);
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);

        let Some(step) = self.steps.get(index) else {
            return Ok(UnitOutput::done(Vec::new()));
        };

        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }

        if let Some(error) = &step.fail {
            return Err(SessionError::worker_failure(error.clone()));
        }

        let is_done = step.done || index + 1 == self.steps.len();
        Ok(UnitOutput {
            messages: step.messages.clone(),
            is_done,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_script() {
        let steps = parse_script(
            r#"[
                {"messages": [{"type": "goal", "value": "Write a poem"}]},
                {"messages": [{"type": "task", "value": "Draft stanza 1"}], "done": true, "delay_ms": 5},
                {"fail": "boom"}
            ]"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].messages[0].kind(), MessageKind::Goal);
        assert!(steps[1].done);
        assert_eq!(steps[1].delay, Duration::from_millis(5));
        assert_eq!(steps[2].fail.as_deref(), Some("boom"));
    }

    #[test]
    fn rejects_bad_message_kind() {
        let err = parse_script(r#"[{"messages": [{"type": "shout", "value": "x"}]}]"#).unwrap_err();
        assert!(matches!(err, SessionError::MessageParse { .. }));
    }

    #[tokio::test]
    async fn last_step_reports_done_and_cursor_rewinds() {
        let worker = ScriptedWorker::new(vec![
            ScriptStep::emit(vec![Message::goal("g")]),
            ScriptStep::emit(vec![Message::task("t")]),
        ]);
        let config = SessionConfig::new("Bot", "g", None);

        worker.on_session_start(&config).await.unwrap();
        assert!(!worker.perform_unit(&config, &[]).await.unwrap().is_done);
        assert!(worker.perform_unit(&config, &[]).await.unwrap().is_done);

        worker.on_session_start(&config).await.unwrap();
        let first = worker.perform_unit(&config, &[]).await.unwrap();
        assert_eq!(first.messages, vec![Message::goal("g")]);
        assert_eq!(worker.units_performed(), 3);
    }
}
