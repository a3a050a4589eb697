use std::path::PathBuf;

use super::format::PcmFormat;

/// Configuration for a recorder session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// PCM format used for capture and playback.
    pub format: PcmFormat,

    /// Directory for the best-effort WAV mirror of saved recordings.
    /// `None` disables the mirror.
    pub export_dir: Option<PathBuf>,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.format.validate()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            format: PcmFormat::default(),
            export_dir: None,
        }
    }
}
