//! Session orchestrator: the public state machine over capture, crypto,
//! storage, and playback.

use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;

use crate::crypto::cipher::{self, CipherKey};
use crate::crypto::digest;
use crate::engine::capture::CaptureEngine;
use crate::engine::playback::{PlaybackEngine, PlaybackOutcome};
use crate::models::config::SessionConfig;
use crate::models::error::AudioVaultError;
use crate::models::recording::{NewRecording, Recording};
use crate::models::state::SessionState;
use crate::storage::export;
use crate::traits::delegate::SessionDelegate;
use crate::traits::line::AudioBackend;
use crate::traits::repository::RecordingRepository;

/// One user's recorder session.
///
/// Owns the state machine `Idle | Recording | Playing` and coordinates the
/// save path (capture → encrypt → digest → repository) and the load path
/// (repository → decrypt → verify digest → playback). Generic over the
/// hardware backend and the repository, so platform lines and storage plug in
/// at the seams.
///
/// Mutual exclusion is structural: a capture or playback engine exists only
/// in its matching state, so at most one worker thread is alive at a time.
pub struct RecorderSession<B: AudioBackend, R: RecordingRepository> {
    backend: B,
    repository: R,
    config: SessionConfig,
    owner_id: i64,
    state: Arc<Mutex<SessionState>>,
    delegate: Option<Arc<dyn SessionDelegate>>,
    capture: Option<CaptureEngine>,
    playback: Option<PlaybackEngine>,
}

impl<B: AudioBackend, R: RecordingRepository> RecorderSession<B, R> {
    pub fn new(
        backend: B,
        repository: R,
        owner_id: i64,
        config: SessionConfig,
    ) -> Result<Self, AudioVaultError> {
        config.validate().map_err(AudioVaultError::Config)?;
        Ok(Self {
            backend,
            repository,
            config,
            owner_id,
            state: Arc::new(Mutex::new(SessionState::Idle)),
            delegate: None,
            capture: None,
            playback: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SessionDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Start capturing. Transition: `Idle → Recording`.
    ///
    /// The input line is opened on the control thread, so a device failure
    /// returns here with the session still `Idle` and no thread started.
    pub fn record(&mut self) -> Result<(), AudioVaultError> {
        self.ensure_idle("record is only valid while idle")?;

        let line = self.backend.open_input(&self.config.format)?;
        let engine = CaptureEngine::spawn(line, self.config.format)?;
        self.capture = Some(engine);
        self.set_state(SessionState::Recording);
        log::info!("capture started for owner {}", self.owner_id);
        Ok(())
    }

    /// Stop capturing and persist the clip. Transition: `Recording → Idle`.
    ///
    /// An empty capture writes no row and returns `Ok(None)`. A blank `name`
    /// falls back to `Recording <timestamp>`. A mid-capture device failure is
    /// reported through the delegate, but the partial buffer is still saved.
    pub fn stop_recording(&mut self, name: &str) -> Result<Option<Recording>, AudioVaultError> {
        if !self.state.lock().is_recording() {
            return Err(AudioVaultError::InvalidState(
                "stop_recording is only valid while recording",
            ));
        }
        let engine = self
            .capture
            .take()
            .ok_or(AudioVaultError::InvalidState("no capture engine"))?;

        let (buffer, capture_err) = engine.stop();
        self.set_state(SessionState::Idle);

        if let Some(err) = capture_err {
            log::warn!("capture ended early, keeping partial buffer: {err}");
            if let Some(delegate) = &self.delegate {
                delegate.on_error(&err);
            }
        }

        if buffer.is_empty() {
            log::info!("empty capture, nothing saved");
            return Ok(None);
        }

        let pcm = buffer.into_vec();
        let duration_secs = self.config.format.duration_secs(pcm.len());
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let name = {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                format!("Recording {timestamp}")
            } else {
                trimmed.to_string()
            }
        };

        // Fresh key per recording; digest covers the plaintext.
        let key = CipherKey::generate();
        let ciphertext = cipher::encrypt(&pcm, &key)?;
        let digest_hex = digest::sha256_hex(&pcm);

        let id = self.repository.save(NewRecording {
            owner_id: self.owner_id,
            name: name.clone(),
            timestamp: timestamp.clone(),
            duration_secs,
            ciphertext,
            encoded_key: key.encode(),
            digest_hex: digest_hex.clone(),
        })?;

        let recording = Recording {
            id,
            owner_id: self.owner_id,
            name,
            timestamp,
            duration_secs,
        };
        log::info!("saved recording {id} ({duration_secs}s, {} bytes)", pcm.len());

        // Best-effort mirror; its failure never affects the save outcome.
        if let Some(dir) = &self.config.export_dir {
            if let Err(err) = export::export_wav(dir, &recording, &digest_hex, &pcm, &self.config.format) {
                log::warn!("WAV mirror for recording {id} failed: {err}");
            }
        }

        if let Some(delegate) = &self.delegate {
            delegate.on_recording_saved(&recording);
        }
        Ok(Some(recording))
    }

    /// Decrypt, verify, and play a stored recording.
    /// Transition: `Idle → Playing`.
    ///
    /// The plaintext digest is recomputed and compared against the stored
    /// digest before the output line is opened; on mismatch this fails with
    /// [`AudioVaultError::Integrity`] and playback never starts.
    pub fn play(&mut self, id: i64) -> Result<(), AudioVaultError> {
        self.ensure_idle("play is only valid while idle")?;

        let payload = self.repository.load_payload(id)?;
        let key = CipherKey::decode(&payload.encoded_key)?;
        let pcm = cipher::decrypt(&payload.ciphertext, &key)?;

        let computed = digest::sha256_hex(&pcm);
        if computed != payload.digest_hex {
            log::error!("integrity check failed for recording {id}");
            return Err(AudioVaultError::Integrity {
                expected: payload.digest_hex,
                computed,
            });
        }
        log::debug!("integrity verified for recording {id}");

        let line = self.backend.open_output(&self.config.format)?;

        // The state must read `Playing` before the worker can possibly finish
        // and flip it back, so transition first and roll back on spawn failure.
        self.set_state(SessionState::Playing { recording_id: id });

        let state = Arc::clone(&self.state);
        let delegate = self.delegate.clone();
        let spawned = PlaybackEngine::spawn(line, pcm, self.config.format, move |outcome| {
            {
                let mut s = state.lock();
                if s.playing_id() == Some(id) {
                    *s = SessionState::Idle;
                }
            }
            match outcome {
                PlaybackOutcome::Completed => {
                    log::info!("playback of recording {id} completed");
                    if let Some(d) = &delegate {
                        d.on_state_changed(&SessionState::Idle);
                        d.on_playback_finished(id);
                    }
                }
                PlaybackOutcome::Cancelled => {
                    log::debug!("playback of recording {id} cancelled");
                }
                PlaybackOutcome::Failed(err) => {
                    log::error!("playback of recording {id} failed: {err}");
                    if let Some(d) = &delegate {
                        d.on_state_changed(&SessionState::Idle);
                        d.on_error(&err);
                    }
                }
            }
        });

        match spawned {
            Ok(engine) => {
                self.playback = Some(engine);
                Ok(())
            }
            Err(err) => {
                self.set_state(SessionState::Idle);
                Err(err)
            }
        }
    }

    /// Cancel playback. Transition: `Playing → Idle`.
    ///
    /// Bounded by one chunk-write latency; the output line is released before
    /// this returns.
    pub fn stop_playback(&mut self) -> Result<(), AudioVaultError> {
        if !self.state.lock().is_playing() {
            return Err(AudioVaultError::InvalidState(
                "stop_playback is only valid while playing",
            ));
        }
        if let Some(engine) = self.playback.take() {
            engine.cancel();
            engine.join();
        }
        self.set_state(SessionState::Idle);
        Ok(())
    }

    /// Remove a stored recording. Permitted only from `Idle`; the state is
    /// unchanged on success and failure alike.
    pub fn delete(&mut self, id: i64) -> Result<(), AudioVaultError> {
        self.ensure_idle("delete is only valid while idle")?;
        self.repository.delete(id)?;
        log::info!("deleted recording {id}");
        Ok(())
    }

    /// This owner's recordings, newest first.
    pub fn list(&self) -> Result<Vec<Recording>, AudioVaultError> {
        self.repository.list_by_owner(self.owner_id)
    }

    fn ensure_idle(&mut self, context: &'static str) -> Result<(), AudioVaultError> {
        if !self.state.lock().is_idle() {
            return Err(AudioVaultError::InvalidState(context));
        }
        // Idle with a leftover engine means playback finished naturally and
        // flipped the state from its own thread; reap the handle.
        if let Some(engine) = self.playback.take() {
            engine.join();
        }
        Ok(())
    }

    fn set_state(&self, new_state: SessionState) {
        *self.state.lock() = new_state;
        if let Some(delegate) = &self.delegate {
            delegate.on_state_changed(&new_state);
        }
    }
}

impl<B: AudioBackend, R: RecordingRepository> Drop for RecorderSession<B, R> {
    /// Abort any live session without saving, so no thread or line leaks.
    fn drop(&mut self) {
        if let Some(engine) = self.capture.take() {
            let _ = engine.stop();
        }
        if let Some(engine) = self.playback.take() {
            engine.cancel();
            engine.join();
        }
    }
}
