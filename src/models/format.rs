use serde::{Deserialize, Serialize};

/// PCM sample format shared by capture and playback.
///
/// Samples are little-endian signed integers. The whole system records and
/// plays one fixed format (`PcmFormat::default()`); capture and playback must
/// agree on it so stored bytes are reinterpreted consistently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample. Valid values: 8, 16.
    pub bit_depth: u16,
    /// Channel count. Valid values: 1 (mono), 2 (stereo).
    pub channels: u16,
}

impl PcmFormat {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if ![8, 16].contains(&self.bit_depth) {
            return Err(format!("unsupported bit depth: {}", self.bit_depth));
        }
        if ![1, 2].contains(&self.channels) {
            return Err(format!("unsupported channel count: {}", self.channels));
        }
        Ok(())
    }

    /// Bytes per frame (one sample across all channels).
    pub fn block_align(&self) -> u32 {
        self.channels as u32 * self.bit_depth as u32 / 8
    }

    /// Bytes per second of audio.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align()
    }

    /// Device I/O chunk size: 100 ms of frames, rounded down to a whole frame.
    ///
    /// Bounds both the stop-join latency of capture and the cancellation
    /// latency of playback to one chunk.
    pub fn chunk_len(&self) -> usize {
        let bytes = self.byte_rate() as usize / 10;
        bytes - bytes % self.block_align() as usize
    }

    /// Duration of `byte_len` bytes of PCM, in whole seconds.
    pub fn duration_secs(&self, byte_len: usize) -> u32 {
        (byte_len as u64 / self.byte_rate() as u64) as u32
    }
}

impl Default for PcmFormat {
    /// The fixed capture/playback format: 44.1 kHz, 16-bit, mono.
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            bit_depth: 16,
            channels: 1,
        }
    }
}
