// Agent session runner
//
// Runs one agent session with a scripted worker and prints the message log as
// it grows. Ctrl-C requests a cooperative stop; a second Ctrl-C is ignored
// until the in-flight unit finishes.
//
// Usage: kodegen-agent-session <name> <goal> [script.json]

use anyhow::{Context, Result, bail};
use kodegen_agent_session::{
    ApiKey, ControllerOptions, LogEvent, ScriptedWorker, SessionController, SessionStatus,
};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let (Some(name), Some(goal)) = (args.next(), args.next()) else {
        bail!("usage: kodegen-agent-session <name> <goal> [script.json]");
    };

    let worker = match args.next() {
        Some(path) => {
            let script = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read script {path}"))?;
            ScriptedWorker::from_json(&script)
                .with_context(|| format!("Invalid script {path}"))?
        }
        None => ScriptedWorker::demo(&goal),
    };

    let options = ControllerOptions::from_env().context("Invalid KODEGEN_AGENT_* settings")?;
    let api_key = std::env::var("KODEGEN_AGENT_API_KEY")
        .ok()
        .and_then(|raw| ApiKey::from_input(&raw));

    let controller = SessionController::new(Arc::new(worker), options);
    let mut log_rx = controller.subscribe_log();
    let mut status_rx = controller.watch_status();

    let session_id = controller.start_new_session(name, goal, api_key)?;
    log::info!("Deployed agent session {session_id}");

    loop {
        tokio::select! {
            event = log_rx.recv() => match event {
                Ok(LogEvent::Appended { index, message }) => println!("{index:>4} {message}"),
                Ok(LogEvent::Cleared) => {}
                Err(RecvError::Lagged(skipped)) => log::warn!("Log output skipped {skipped} message(s)"),
                Err(RecvError::Closed) => break,
            },
            changed = status_rx.changed() => {
                if changed.is_err() || *status_rx.borrow() == SessionStatus::NoSession {
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                if controller.request_stop() {
                    log::info!("Stopping agent after the current unit...");
                }
            },
        }
    }

    // Print anything appended between the last event and completion
    while let Ok(LogEvent::Appended { index, message }) = log_rx.try_recv() {
        println!("{index:>4} {message}");
    }

    if let Some(outcome) = controller.last_outcome() {
        log::info!("Session ended: {outcome:?}");
    }
    Ok(())
}
