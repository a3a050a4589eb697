use serde::{Deserialize, Serialize};

/// Metadata of a stored recording, as returned by listing.
///
/// The encrypted payload is loaded separately via
/// [`RecordingRepository::load_payload`](crate::traits::repository::RecordingRepository::load_payload).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Repository-assigned id, unique and immutable once assigned.
    pub id: i64,
    /// Opaque authenticated owner id.
    pub owner_id: i64,
    /// Display name, non-empty.
    pub name: String,
    /// Creation timestamp, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    /// Duration in whole seconds, derived from byte length and the fixed format.
    pub duration_secs: u32,
}

/// A recording about to be persisted. The id is assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewRecording {
    pub owner_id: i64,
    pub name: String,
    pub timestamp: String,
    pub duration_secs: u32,
    /// AES-256-GCM sealed plaintext, non-empty.
    pub ciphertext: Vec<u8>,
    /// Base64 encoding of this recording's key. Never reused across rows.
    pub encoded_key: String,
    /// 64-char lowercase hex SHA-256 of the plaintext.
    pub digest_hex: String,
}

/// The stored payload needed to decrypt and verify one recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingPayload {
    pub ciphertext: Vec<u8>,
    pub encoded_key: String,
    pub digest_hex: String,
}
