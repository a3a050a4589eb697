use thiserror::Error;

/// Errors surfaced by the audio vault core.
///
/// Failures on the control thread are returned synchronously; failures inside
/// a capture or playback thread are marshalled back through the engine's
/// completion path, never thrown across the thread boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioVaultError {
    /// Opening, reading, or writing a hardware line failed.
    #[error("device error: {0}")]
    Device(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Malformed ciphertext, wrong key, or authentication tag mismatch.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Stored key string could not be decoded into key material.
    #[error("malformed key: {0}")]
    KeyFormat(String),

    /// Recomputed plaintext digest does not match the stored digest.
    /// Signals corruption or tampering; playback must not start.
    #[error("integrity check failed: stored {expected}, computed {computed}")]
    Integrity { expected: String, computed: String },

    #[error("repository error: {0}")]
    Repository(String),

    #[error("recording {0} not found")]
    NotFound(i64),

    /// The requested transition is not valid from the current state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Auxiliary WAV mirror failed. Logged by the save path, never propagated
    /// into the primary save outcome.
    #[error("export failed: {0}")]
    Export(String),
}
