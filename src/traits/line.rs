use crate::models::error::AudioVaultError;
use crate::models::format::PcmFormat;

/// An opened, started hardware input line.
///
/// Implemented by platform backends (WASAPI, ALSA, Core Audio) outside this
/// crate. `read` is a blocking call confined to the dedicated capture thread;
/// the control thread never touches a live line.
pub trait InputLine: Send {
    /// Read up to `buf.len()` bytes of PCM into `buf`.
    ///
    /// Returns the number of bytes read. `Ok(0)` means no data was available
    /// right now, not end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, AudioVaultError>;

    /// Stop delivering data.
    fn stop(&mut self) -> Result<(), AudioVaultError>;

    /// Release the hardware line.
    fn close(&mut self) -> Result<(), AudioVaultError>;
}

/// An opened, started hardware output line.
pub trait OutputLine: Send {
    /// Write one chunk of PCM. Blocks until the device accepts it.
    fn write(&mut self, buf: &[u8]) -> Result<(), AudioVaultError>;

    /// Block until all written data has been played.
    fn drain(&mut self) -> Result<(), AudioVaultError>;

    /// Stop playback.
    fn stop(&mut self) -> Result<(), AudioVaultError>;

    /// Release the hardware line.
    fn close(&mut self) -> Result<(), AudioVaultError>;
}

/// Factory for hardware lines.
///
/// A line is exclusively owned by its engine for the session's duration; open
/// failures surface as [`AudioVaultError::Device`] before any thread is
/// spawned, so a failed open leaves no partial session state.
pub trait AudioBackend: Send {
    type Input: InputLine + 'static;
    type Output: OutputLine + 'static;

    /// Open and start an input line for `format`.
    fn open_input(&self, format: &PcmFormat) -> Result<Self::Input, AudioVaultError>;

    /// Open and start an output line for `format`.
    fn open_output(&self, format: &PcmFormat) -> Result<Self::Output, AudioVaultError>;
}
