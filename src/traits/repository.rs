use crate::models::error::AudioVaultError;
use crate::models::recording::{NewRecording, Recording, RecordingPayload};

/// Abstract persistence contract for recordings.
///
/// The core never embeds SQL or file-format knowledge; it stores and retrieves
/// `(ciphertext, encoded key, digest, metadata)` tuples keyed by id and owner.
/// Retries, if any, belong to the implementation, not the audio core.
pub trait RecordingRepository: Send {
    /// Persist a new recording and return its assigned id.
    ///
    /// The new row is visible to `list_by_owner` once this returns.
    fn save(&self, recording: NewRecording) -> Result<i64, AudioVaultError>;

    /// All recordings owned by `owner_id`, newest first.
    fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Recording>, AudioVaultError>;

    /// Ciphertext, encoded key, and stored digest for one recording.
    fn load_payload(&self, id: i64) -> Result<RecordingPayload, AudioVaultError>;

    /// Remove a recording. Fails with [`AudioVaultError::NotFound`] if the id
    /// does not exist; the repository is left unchanged in that case.
    fn delete(&self, id: i64) -> Result<(), AudioVaultError>;
}
