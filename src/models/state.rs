/// Session state machine.
///
/// State transitions:
/// ```text
/// Idle --record--> Recording --stop--> Idle
/// Idle --play(id)--> Playing --stop/completed--> Idle
/// ```
///
/// There is no direct transition between `Recording` and `Playing`; at most
/// one capture or playback thread is alive at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
    Playing { recording_id: i64 },
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }

    /// Id of the recording being played, if any.
    pub fn playing_id(&self) -> Option<i64> {
        match self {
            Self::Playing { recording_id } => Some(*recording_id),
            _ => None,
        }
    }
}
