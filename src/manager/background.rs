//! Background run loop for agent sessions
//!
//! The run loop owns the worker calls for one session. It is the only
//! producer of that session's messages and reports completion exactly once.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::callbacks::SessionCallbacks;
use super::session::RunLimits;
use crate::error::SessionError;
use crate::types::identifiers::SessionId;
use crate::types::messages::Message;
use crate::types::options::SessionConfig;
use crate::types::status::SessionOutcome;
use crate::worker::{UnitOutput, Worker};

/// Everything the run loop task owns
pub(super) struct RunLoopContext {
    pub session_id: SessionId,
    pub config: SessionConfig,
    pub worker: Arc<dyn Worker>,
    pub callbacks: Arc<dyn SessionCallbacks>,
    pub stop: CancellationToken,
    pub limits: RunLimits,
    pub units_completed: Arc<AtomicU32>,
    pub finished: Arc<AtomicBool>,
}

/// Spawn the run loop task for a session
///
/// The task runs until the worker reports done, the stop flag is observed at
/// a unit boundary, the unit cap is reached, or the worker fails. It then
/// marks the session finished and fires `on_complete`.
pub(super) fn spawn_run_loop(ctx: RunLoopContext) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = run_units(&ctx).await;

        ctx.finished.store(true, Ordering::SeqCst);
        log::info!(
            "[{}] Session finished after {} unit(s): {:?}",
            ctx.session_id,
            ctx.units_completed.load(Ordering::SeqCst),
            outcome
        );
        ctx.callbacks.on_complete(outcome);
    })
}

async fn run_units(ctx: &RunLoopContext) -> SessionOutcome {
    // Messages emitted by this session, handed back to the worker
    let mut history: Vec<Message> = Vec::new();

    if ctx.stop.is_cancelled() {
        log::debug!("[{}] Stopped before the run loop began", ctx.session_id);
        return SessionOutcome::Stopped;
    }

    let started = AssertUnwindSafe(ctx.worker.on_session_start(&ctx.config))
        .catch_unwind()
        .await;
    if let Err(error) = flatten(started) {
        return fail(ctx, &error);
    }

    loop {
        if ctx.stop.is_cancelled() {
            log::debug!("[{}] Stop flag observed", ctx.session_id);
            return SessionOutcome::Stopped;
        }

        let completed = ctx.units_completed.load(Ordering::SeqCst);
        if let Some(cap) = ctx.limits.unit_cap
            && completed >= cap
        {
            ctx.callbacks.on_message(Message::system(format!(
                "This agent has maxed out on loops ({cap}) and is shutting down."
            )));
            return SessionOutcome::LoopLimitReached;
        }

        log::debug!("[{}] Performing unit {}", ctx.session_id, completed + 1);
        let result = AssertUnwindSafe(ctx.worker.perform_unit(&ctx.config, &history))
            .catch_unwind()
            .await;

        let output: UnitOutput = match flatten(result) {
            Ok(output) => output,
            Err(error) => return fail(ctx, &error),
        };

        for message in output.messages {
            history.push(message.clone());
            ctx.callbacks.on_message(message);
        }
        ctx.units_completed.fetch_add(1, Ordering::SeqCst);

        if output.is_done {
            return SessionOutcome::Completed;
        }

        // Suspension point between units; the stop flag cuts the delay short
        if ctx.limits.unit_delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::select! {
                () = ctx.stop.cancelled() => {}
                () = tokio::time::sleep(ctx.limits.unit_delay) => {}
            }
        }
    }
}

fn fail(ctx: &RunLoopContext, error: &SessionError) -> SessionOutcome {
    let text = match error {
        SessionError::WorkerFailure(msg) => msg.clone(),
        other => other.to_string(),
    };
    log::error!("[{}] Worker failed: {}", ctx.session_id, text);
    ctx.callbacks.on_message(Message::error(text.clone()));
    SessionOutcome::Failed(text)
}

fn flatten<T>(
    result: std::result::Result<crate::error::Result<T>, Box<dyn Any + Send>>,
) -> crate::error::Result<T> {
    match result {
        Ok(inner) => inner,
        Err(panic) => Err(SessionError::worker_failure(format!(
            "worker panicked: {}",
            panic_message(panic.as_ref())
        ))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
