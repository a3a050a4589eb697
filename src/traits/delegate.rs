use crate::models::error::AudioVaultError;
use crate::models::recording::Recording;
use crate::models::state::SessionState;

/// Event delegate for session notifications.
///
/// This is the boundary the external UI is driven through. Methods may be
/// called from the playback thread, not only the control thread;
/// implementations should marshal to their own thread if needed.
pub trait SessionDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, state: &SessionState);

    /// Called when a completed capture has been persisted.
    fn on_recording_saved(&self, recording: &Recording);

    /// Called when playback of `recording_id` finishes naturally.
    fn on_playback_finished(&self, recording_id: i64);

    /// Called when a failure occurs inside a worker thread.
    fn on_error(&self, error: &AudioVaultError);
}
