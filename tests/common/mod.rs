//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use kodegen_agent_session::{
    Message, Result, SessionCallbacks, SessionConfig, SessionController, SessionError,
    SessionOutcome, UnitOutput, Worker,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, Semaphore, mpsc};

/// Upper bound for any wait in tests
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wait for the controller to become idle or fail the test
pub async fn wait_idle(controller: &SessionController) {
    tokio::time::timeout(TEST_TIMEOUT, controller.wait_idle())
        .await
        .expect("session did not finish in time");
}

pub fn values(messages: &[Message]) -> Vec<String> {
    messages.iter().map(|m| m.value().to_string()).collect()
}

// ============================================================================
// Gated worker
// ============================================================================

/// Worker whose units block until the test releases them
///
/// Each unit announces its 1-based index on `started`, waits for one permit,
/// then emits `Task("unit N")` and asks for more work.
pub struct GatedWorker {
    started_tx: mpsc::UnboundedSender<usize>,
    release: Arc<Semaphore>,
    units: AtomicUsize,
}

pub struct GateHandle {
    pub started: mpsc::UnboundedReceiver<usize>,
    pub release: Arc<Semaphore>,
}

impl GateHandle {
    /// Wait until unit `expected` is in flight
    pub async fn unit_started(&mut self, expected: usize) {
        let index = tokio::time::timeout(TEST_TIMEOUT, self.started.recv())
            .await
            .expect("unit did not start in time")
            .expect("worker dropped");
        assert_eq!(index, expected);
    }

    /// Let one in-flight unit finish
    pub fn release_one(&self) {
        self.release.add_permits(1);
    }
}

impl GatedWorker {
    pub fn new() -> (Arc<Self>, GateHandle) {
        let (started_tx, started) = mpsc::unbounded_channel();
        let release = Arc::new(Semaphore::new(0));
        let worker = Arc::new(Self {
            started_tx,
            release: Arc::clone(&release),
            units: AtomicUsize::new(0),
        });
        (worker, GateHandle { started, release })
    }

    pub fn units_started(&self) -> usize {
        self.units.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Worker for GatedWorker {
    async fn perform_unit(
        &self,
        _config: &SessionConfig,
        _prior_messages: &[Message],
    ) -> Result<UnitOutput> {
        let index = self.units.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.started_tx.send(index);
        self.release
            .acquire()
            .await
            .map_err(|e| SessionError::worker_failure(e.to_string()))?
            .forget();
        Ok(UnitOutput::continue_with(vec![Message::task(format!(
            "unit {index}"
        ))]))
    }
}

// ============================================================================
// Recording callbacks
// ============================================================================

/// Callbacks that record everything a session reports
#[derive(Default)]
pub struct RecordingCallbacks {
    pub messages: Mutex<Vec<Message>>,
    pub outcomes: Mutex<Vec<SessionOutcome>>,
    pub completed: Notify,
}

impl RecordingCallbacks {
    pub async fn wait_complete(&self) {
        tokio::time::timeout(TEST_TIMEOUT, async {
            loop {
                let notified = self.completed.notified();
                if !self.outcomes.lock().is_empty() {
                    return;
                }
                notified.await;
            }
        })
        .await
        .expect("session did not complete in time");
    }
}

impl SessionCallbacks for RecordingCallbacks {
    fn on_message(&self, message: Message) {
        self.messages.lock().push(message);
    }

    fn on_complete(&self, outcome: SessionOutcome) {
        self.outcomes.lock().push(outcome);
        self.completed.notify_waiters();
    }
}
