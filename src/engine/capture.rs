//! Dedicated-thread PCM capture.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::models::error::AudioVaultError;
use crate::models::format::PcmFormat;
use crate::processing::pcm_buffer::PcmBuffer;
use crate::traits::line::InputLine;

/// A live capture session: one input line, one accumulating buffer, one
/// worker thread.
///
/// Created by [`spawn`](Self::spawn) with an already-opened line, so device
/// failures surface to the caller before any thread exists. Consumed by
/// [`stop`](Self::stop), which joins the worker and hands the buffer to the
/// caller — the engine cannot be started twice.
pub struct CaptureEngine {
    stop_flag: Arc<AtomicBool>,
    handle: thread::JoinHandle<(PcmBuffer, Option<AudioVaultError>)>,
}

impl CaptureEngine {
    /// Start the capture loop on a dedicated thread.
    ///
    /// The loop polls the line in 100 ms chunks and appends to a thread-local
    /// buffer; it performs no storage I/O, so buffer growth never blocks the
    /// device read path. A mid-capture device failure terminates the loop but
    /// keeps the partial buffer.
    pub fn spawn<L>(mut line: L, format: PcmFormat) -> Result<Self, AudioVaultError>
    where
        L: InputLine + 'static,
    {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&stop_flag);
        let chunk_len = format.chunk_len().max(1);

        let handle = thread::Builder::new()
            .name("audio-capture".into())
            .spawn(move || {
                let mut buffer = PcmBuffer::with_capacity(chunk_len * 10);
                let mut chunk = vec![0u8; chunk_len];
                let mut failure = None;

                while !stop.load(Ordering::SeqCst) {
                    match line.read(&mut chunk) {
                        Ok(0) => thread::sleep(Duration::from_millis(1)),
                        Ok(n) => buffer.append(&chunk[..n]),
                        Err(e) => {
                            log::error!("capture read failed after {} bytes: {e}", buffer.len());
                            failure = Some(e);
                            break;
                        }
                    }
                }

                // Stop the line before draining: a live line keeps producing,
                // so the drain below terminates only once capture has ceased.
                if let Err(e) = line.stop() {
                    log::warn!("input line stop failed: {e}");
                }

                // Drain samples the line buffered between the stop request and
                // the flag being observed. The line is stopped, so this
                // reaches `Ok(0)` within one chunk.
                if failure.is_none() {
                    loop {
                        match line.read(&mut chunk) {
                            Ok(0) => break,
                            Ok(n) => buffer.append(&chunk[..n]),
                            Err(e) => {
                                log::error!("capture drain failed after {} bytes: {e}", buffer.len());
                                failure = Some(e);
                                break;
                            }
                        }
                    }
                }
                if let Err(e) = line.close() {
                    log::warn!("input line close failed: {e}");
                }

                log::debug!("capture thread exiting with {} bytes", buffer.len());
                (buffer, failure)
            })
            .map_err(|e| AudioVaultError::Device(format!("failed to spawn capture thread: {e}")))?;

        Ok(Self { stop_flag, handle })
    }

    /// Stop the session: signal the loop, join the worker, take the buffer.
    ///
    /// The join happens-before the buffer is read by the caller, so every
    /// sample captured before the stop request is in the returned buffer. A
    /// mid-capture failure is returned alongside the partial buffer rather
    /// than discarding it.
    pub fn stop(self) -> (PcmBuffer, Option<AudioVaultError>) {
        self.stop_flag.store(true, Ordering::SeqCst);
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => (
                PcmBuffer::new(),
                Some(AudioVaultError::Device("capture thread panicked".into())),
            ),
        }
    }
}
