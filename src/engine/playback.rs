//! Dedicated-thread PCM playback with cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::models::error::AudioVaultError;
use crate::models::format::PcmFormat;
use crate::traits::line::OutputLine;

/// How a playback session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The input was exhausted and the line drained.
    Completed,
    /// The cancellation flag was observed before the input was exhausted.
    Cancelled,
    /// A device failure ended playback early. Reported exactly once.
    Failed(AudioVaultError),
}

/// A live playback session: one output line, one worker thread, one
/// cancellation flag.
///
/// The worker writes fixed-size chunks and checks the flag each iteration, so
/// cancellation latency is bounded by one chunk write. Every exit path runs
/// the same drain/stop/close sequence before the terminal outcome is
/// delivered — no line is leaked, and no error crosses the thread boundary
/// except through the `on_done` callback.
pub struct PlaybackEngine {
    cancel_flag: Arc<AtomicBool>,
    handle: thread::JoinHandle<()>,
}

impl PlaybackEngine {
    /// Start playing `pcm` on a dedicated thread.
    ///
    /// `on_done` is invoked exactly once, from the playback thread, after the
    /// line has been released.
    pub fn spawn<L, F>(
        mut line: L,
        pcm: Vec<u8>,
        format: PcmFormat,
        on_done: F,
    ) -> Result<Self, AudioVaultError>
    where
        L: OutputLine + 'static,
        F: FnOnce(PlaybackOutcome) + Send + 'static,
    {
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let cancel = Arc::clone(&cancel_flag);
        let chunk_len = format.chunk_len().max(1);

        let handle = thread::Builder::new()
            .name("audio-playback".into())
            .spawn(move || {
                let mut outcome = PlaybackOutcome::Completed;

                for chunk in pcm.chunks(chunk_len) {
                    if cancel.load(Ordering::SeqCst) {
                        outcome = PlaybackOutcome::Cancelled;
                        break;
                    }
                    if let Err(e) = line.write(chunk) {
                        log::error!("playback write failed: {e}");
                        outcome = PlaybackOutcome::Failed(e);
                        break;
                    }
                }

                // Same release sequence on every exit path.
                if let Err(e) = line.drain() {
                    log::warn!("output line drain failed: {e}");
                }
                if let Err(e) = line.stop() {
                    log::warn!("output line stop failed: {e}");
                }
                if let Err(e) = line.close() {
                    log::warn!("output line close failed: {e}");
                }

                on_done(outcome);
            })
            .map_err(|e| AudioVaultError::Device(format!("failed to spawn playback thread: {e}")))?;

        Ok(Self {
            cancel_flag,
            handle,
        })
    }

    /// Request cooperative cancellation. The worker observes the flag within
    /// one chunk-write latency.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    /// Wait for the worker to finish and release the line.
    pub fn join(self) {
        if self.handle.join().is_err() {
            log::error!("playback thread panicked");
        }
    }
}
