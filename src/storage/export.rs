//! Best-effort WAV mirror of saved recordings.
//!
//! After a recording is persisted, its plaintext PCM may additionally be
//! written as a standard uncompressed WAV file with a JSON metadata sidecar.
//! This is a side channel: failures here are logged by the caller and never
//! affect the primary save outcome.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::error::AudioVaultError;
use crate::models::format::PcmFormat;
use crate::models::recording::Recording;
use crate::processing::wav_format;

/// Metadata written as a JSON sidecar beside the exported WAV.
///
/// Creates `{name}.metadata.json` alongside `{name}.wav`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub id: i64,
    pub name: String,
    pub timestamp: String,
    pub duration_secs: u32,
    pub digest_hex: String,
    pub format: PcmFormat,
}

/// Map any character outside `[A-Za-z0-9.-]` to `_`, yielding a safe filename.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}

/// Write `<dir>/<sanitized-name>.wav` plus its metadata sidecar.
///
/// Returns the path of the written WAV file.
pub fn export_wav(
    dir: &Path,
    recording: &Recording,
    digest_hex: &str,
    pcm: &[u8],
    format: &PcmFormat,
) -> Result<PathBuf, AudioVaultError> {
    fs::create_dir_all(dir)
        .map_err(|e| AudioVaultError::Export(format!("failed to create export directory: {e}")))?;

    let file_name = format!("{}.wav", sanitize_file_name(&recording.name));
    let path = dir.join(file_name);

    let header = wav_format::generate_wav_header(format, pcm.len() as u32);
    let mut file = File::create(&path)
        .map_err(|e| AudioVaultError::Export(format!("failed to create file: {e}")))?;
    file.write_all(&header)
        .map_err(|e| AudioVaultError::Export(format!("write failed: {e}")))?;
    file.write_all(pcm)
        .map_err(|e| AudioVaultError::Export(format!("write failed: {e}")))?;

    let metadata = ExportMetadata {
        id: recording.id,
        name: recording.name.clone(),
        timestamp: recording.timestamp.clone(),
        duration_secs: recording.duration_secs,
        digest_hex: digest_hex.to_string(),
        format: *format,
    };
    write_metadata(&metadata, &path)?;

    Ok(path)
}

/// Write recording metadata as a JSON sidecar file.
pub fn write_metadata(metadata: &ExportMetadata, wav_path: &Path) -> Result<(), AudioVaultError> {
    let metadata_path = wav_path.with_extension("metadata.json");
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| AudioVaultError::Export(format!("failed to serialize metadata: {e}")))?;
    fs::write(&metadata_path, json)
        .map_err(|e| AudioVaultError::Export(format!("failed to write metadata: {e}")))?;
    Ok(())
}

/// Read recording metadata from a JSON sidecar file.
pub fn read_metadata(wav_path: &Path) -> Result<ExportMetadata, AudioVaultError> {
    let metadata_path = wav_path.with_extension("metadata.json");
    let json = fs::read_to_string(&metadata_path)
        .map_err(|e| AudioVaultError::Export(format!("failed to read metadata: {e}")))?;
    serde_json::from_str(&json)
        .map_err(|e| AudioVaultError::Export(format!("failed to parse metadata: {e}")))
}
