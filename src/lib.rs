//! # audio-vault
//!
//! Encrypted voice-note core library.
//!
//! Captures raw PCM from an input line on a dedicated thread, seals it with a
//! fresh AES-256-GCM key per recording, stores it beside a SHA-256 digest of
//! the plaintext, and verifies that digest on every load before playback may
//! start. Platform audio backends implement the `InputLine`/`OutputLine`
//! traits and plug into the generic `RecorderSession`.
//!
//! ## Architecture
//!
//! ```text
//! audio-vault (this crate)
//! ├── traits/       ← AudioBackend, InputLine, OutputLine, RecordingRepository, SessionDelegate
//! ├── models/       ← AudioVaultError, SessionState, PcmFormat, SessionConfig, Recording
//! ├── crypto/       ← AES-256-GCM cipher, SHA-256 hex digest
//! ├── processing/   ← PcmBuffer, WAV header generation
//! ├── engine/       ← CaptureEngine, PlaybackEngine (thread-per-session)
//! ├── session/      ← RecorderSession (orchestrator state machine)
//! └── storage/      ← SQLite repository, WAV export mirror
//! ```

pub mod crypto;
pub mod engine;
pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types at crate root for convenience.
pub use crypto::cipher::CipherKey;
pub use engine::capture::CaptureEngine;
pub use engine::playback::{PlaybackEngine, PlaybackOutcome};
pub use models::config::SessionConfig;
pub use models::error::AudioVaultError;
pub use models::format::PcmFormat;
pub use models::recording::{NewRecording, Recording, RecordingPayload};
pub use models::state::SessionState;
pub use processing::pcm_buffer::PcmBuffer;
pub use session::recorder::RecorderSession;
pub use storage::sqlite::SqliteRecordingRepository;
pub use traits::delegate::SessionDelegate;
pub use traits::line::{AudioBackend, InputLine, OutputLine};
pub use traits::repository::RecordingRepository;
