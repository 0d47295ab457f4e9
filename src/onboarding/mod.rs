//! First-run onboarding gate
//!
//! Decides which informational dialog to show on first load from a persisted
//! "seen before" flag. Independent of the session controller; the store is
//! injected so nothing here is ambient global state.

mod store;

use std::sync::Arc;

use crate::error::Result;

pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Store key of the "seen onboarding" flag
pub const ONBOARDING_SEEN_KEY: &str = "onboarding-seen";

/// Dialog to show on load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    /// First visit: explain what the agent does
    Help,
    /// Returning visit: offer the API key settings
    Settings,
}

/// Reads and records the onboarding flag
#[derive(Clone)]
pub struct OnboardingGate {
    store: Arc<dyn KeyValueStore>,
}

impl OnboardingGate {
    /// Create a gate over `store`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Whether the flag is already recorded
    ///
    /// # Errors
    /// Propagates store read errors
    pub fn has_seen(&self) -> Result<bool> {
        Ok(self.store.get(ONBOARDING_SEEN_KEY)?.is_some())
    }

    /// Pick the dialog for this load and record the visit
    ///
    /// # Errors
    /// Propagates store read and write errors
    pub fn first_dialog(&self) -> Result<Dialog> {
        let dialog = if self.has_seen()? {
            Dialog::Settings
        } else {
            Dialog::Help
        };
        self.store
            .set(ONBOARDING_SEEN_KEY, serde_json::Value::Bool(true))?;
        log::debug!("Onboarding dialog: {dialog:?}");
        Ok(dialog)
    }
}

impl std::fmt::Debug for OnboardingGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnboardingGate")
            .field("store", &"<dyn KeyValueStore>")
            .finish()
    }
}
