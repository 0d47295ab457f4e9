//! Session stop intent

use super::core::SessionController;

impl SessionController {
    /// Request a cooperative stop of the active session
    ///
    /// No-op when no session exists. Repeated calls are harmless. The session
    /// finishes its in-flight unit, then exits and the status returns to
    /// `NoSession`.
    ///
    /// Returns `true` if a session received the request.
    pub fn request_stop(&self) -> bool {
        let mut state = self.inner.lock();
        let Some(session) = state.active.as_ref() else {
            log::debug!("Stop requested with no active session");
            return false;
        };

        session.stop();
        state.stop_requested = true;
        self.inner.publish_status(&state);
        true
    }
}
