//! Simulated devices and an in-memory repository for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::error::AudioVaultError;
use crate::models::format::PcmFormat;
use crate::models::recording::{NewRecording, Recording, RecordingPayload};
use crate::traits::line::{AudioBackend, InputLine, OutputLine};
use crate::traits::repository::RecordingRepository;

/// Lifecycle flags observed on a simulated input line.
#[derive(Debug, Default)]
pub(crate) struct InputProbe {
    pub stopped: bool,
    pub closed: bool,
}

/// Input line that serves a fixed byte script, then reports no data.
pub(crate) struct SimInput {
    script: Vec<u8>,
    pos: usize,
    fail_after: Option<usize>,
    probe: Arc<Mutex<InputProbe>>,
}

impl SimInput {
    pub fn new(script: Vec<u8>) -> Self {
        Self {
            script,
            pos: 0,
            fail_after: None,
            probe: Arc::new(Mutex::new(InputProbe::default())),
        }
    }

    /// Fail with a device error once `n` bytes have been delivered.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn probe(&self) -> Arc<Mutex<InputProbe>> {
        Arc::clone(&self.probe)
    }
}

impl InputLine for SimInput {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, AudioVaultError> {
        if let Some(limit) = self.fail_after {
            if self.pos >= limit {
                return Err(AudioVaultError::Device("simulated input failure".into()));
            }
        }

        let mut n = (self.script.len() - self.pos).min(buf.len());
        if let Some(limit) = self.fail_after {
            n = n.min(limit - self.pos);
        }
        if n == 0 {
            return Ok(0);
        }

        buf[..n].copy_from_slice(&self.script[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn stop(&mut self) -> Result<(), AudioVaultError> {
        self.probe.lock().stopped = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), AudioVaultError> {
        self.probe.lock().closed = true;
        Ok(())
    }
}

/// Everything a simulated output line observed.
#[derive(Debug, Default)]
pub(crate) struct OutputProbe {
    pub written: Vec<u8>,
    pub write_calls: usize,
    pub drained: bool,
    pub stopped: bool,
    pub closed: bool,
}

/// Output line that records writes and lifecycle calls.
pub(crate) struct SimOutput {
    probe: Arc<Mutex<OutputProbe>>,
    fail_on_write: Option<usize>,
    write_delay: Option<Duration>,
}

impl SimOutput {
    pub fn new() -> Self {
        Self {
            probe: Arc::new(Mutex::new(OutputProbe::default())),
            fail_on_write: None,
            write_delay: None,
        }
    }

    /// Fail the write with the given zero-based call index.
    pub fn failing_on_write(mut self, call: usize) -> Self {
        self.fail_on_write = Some(call);
        self
    }

    /// Sleep before each write, to widen the cancellation window.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    fn with_probe(probe: Arc<Mutex<OutputProbe>>, delay: Option<Duration>) -> Self {
        Self {
            probe,
            fail_on_write: None,
            write_delay: delay,
        }
    }

    pub fn probe(&self) -> Arc<Mutex<OutputProbe>> {
        Arc::clone(&self.probe)
    }
}

impl OutputLine for SimOutput {
    fn write(&mut self, buf: &[u8]) -> Result<(), AudioVaultError> {
        if let Some(delay) = self.write_delay {
            std::thread::sleep(delay);
        }
        let mut probe = self.probe.lock();
        let call = probe.write_calls;
        probe.write_calls += 1;
        if self.fail_on_write == Some(call) {
            return Err(AudioVaultError::Device("simulated output failure".into()));
        }
        probe.written.extend_from_slice(buf);
        Ok(())
    }

    fn drain(&mut self) -> Result<(), AudioVaultError> {
        self.probe.lock().drained = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioVaultError> {
        self.probe.lock().stopped = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), AudioVaultError> {
        self.probe.lock().closed = true;
        Ok(())
    }
}

/// Backend serving one input script and one shared output probe.
pub(crate) struct SimBackend {
    input_script: Vec<u8>,
    input_fail_after: Option<usize>,
    fail_open_input: bool,
    fail_open_output: bool,
    output_write_delay: Option<Duration>,
    output_probe: Arc<Mutex<OutputProbe>>,
    outputs_opened: Arc<AtomicUsize>,
}

impl SimBackend {
    pub fn new(input_script: Vec<u8>) -> Self {
        Self {
            input_script,
            input_fail_after: None,
            fail_open_input: false,
            fail_open_output: false,
            output_write_delay: None,
            output_probe: Arc::new(Mutex::new(OutputProbe::default())),
            outputs_opened: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_input_open(mut self) -> Self {
        self.fail_open_input = true;
        self
    }

    /// Input line fails once `n` bytes have been delivered.
    pub fn failing_input_after(mut self, n: usize) -> Self {
        self.input_fail_after = Some(n);
        self
    }

    pub fn failing_output_open(mut self) -> Self {
        self.fail_open_output = true;
        self
    }

    pub fn with_output_write_delay(mut self, delay: Duration) -> Self {
        self.output_write_delay = Some(delay);
        self
    }

    pub fn output_probe(&self) -> Arc<Mutex<OutputProbe>> {
        Arc::clone(&self.output_probe)
    }

    /// Counter of output lines opened so far; shared across moves.
    pub fn outputs_opened_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.outputs_opened)
    }
}

impl AudioBackend for SimBackend {
    type Input = SimInput;
    type Output = SimOutput;

    fn open_input(&self, _format: &PcmFormat) -> Result<SimInput, AudioVaultError> {
        if self.fail_open_input {
            return Err(AudioVaultError::Device("no input device".into()));
        }
        let mut line = SimInput::new(self.input_script.clone());
        line.fail_after = self.input_fail_after;
        Ok(line)
    }

    fn open_output(&self, _format: &PcmFormat) -> Result<SimOutput, AudioVaultError> {
        if self.fail_open_output {
            return Err(AudioVaultError::Device("no output device".into()));
        }
        self.outputs_opened.fetch_add(1, Ordering::SeqCst);
        Ok(SimOutput::with_probe(
            Arc::clone(&self.output_probe),
            self.output_write_delay,
        ))
    }
}

struct StoredRow {
    recording: Recording,
    payload: RecordingPayload,
}

/// In-memory repository with corruption hooks for integrity tests.
///
/// Clones share the same store, so a test can keep a handle after moving the
/// repository into a session.
#[derive(Clone, Default)]
pub(crate) struct MemoryRepository {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    next_id: i64,
    rows: Vec<StoredRow>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one ciphertext byte of a stored recording.
    pub fn corrupt_ciphertext(&self, id: i64) {
        let mut inner = self.inner.lock();
        let row = inner
            .rows
            .iter_mut()
            .find(|r| r.recording.id == id)
            .expect("row to corrupt");
        let last = row.payload.ciphertext.len() - 1;
        row.payload.ciphertext[last] ^= 0x01;
    }

    /// Replace the stored key of a recording with text that is not base64.
    pub fn corrupt_key(&self, id: i64) {
        let mut inner = self.inner.lock();
        let row = inner
            .rows
            .iter_mut()
            .find(|r| r.recording.id == id)
            .expect("row to corrupt");
        row.payload.encoded_key = "not a base64 key!".into();
    }

    /// Replace the first digest character of a stored recording.
    pub fn corrupt_digest(&self, id: i64) {
        let mut inner = self.inner.lock();
        let row = inner
            .rows
            .iter_mut()
            .find(|r| r.recording.id == id)
            .expect("row to corrupt");
        let flipped = if row.payload.digest_hex.starts_with('0') { "1" } else { "0" };
        row.payload.digest_hex.replace_range(0..1, flipped);
    }
}

impl RecordingRepository for MemoryRepository {
    fn save(&self, recording: NewRecording) -> Result<i64, AudioVaultError> {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.rows.push(StoredRow {
            recording: Recording {
                id,
                owner_id: recording.owner_id,
                name: recording.name,
                timestamp: recording.timestamp,
                duration_secs: recording.duration_secs,
            },
            payload: RecordingPayload {
                ciphertext: recording.ciphertext,
                encoded_key: recording.encoded_key,
                digest_hex: recording.digest_hex,
            },
        });
        Ok(id)
    }

    fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Recording>, AudioVaultError> {
        Ok(self
            .inner
            .lock()
            .rows
            .iter()
            .rev()
            .filter(|r| r.recording.owner_id == owner_id)
            .map(|r| r.recording.clone())
            .collect())
    }

    fn load_payload(&self, id: i64) -> Result<RecordingPayload, AudioVaultError> {
        self.inner
            .lock()
            .rows
            .iter()
            .find(|r| r.recording.id == id)
            .map(|r| r.payload.clone())
            .ok_or(AudioVaultError::NotFound(id))
    }

    fn delete(&self, id: i64) -> Result<(), AudioVaultError> {
        let mut inner = self.inner.lock();
        let before = inner.rows.len();
        inner.rows.retain(|r| r.recording.id != id);
        if inner.rows.len() == before {
            return Err(AudioVaultError::NotFound(id));
        }
        Ok(())
    }
}
