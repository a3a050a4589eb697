/// Growable accumulator for captured PCM bytes.
///
/// Written only by the capture thread while the session is live, then handed
/// off by value to the orchestrator when the session stops. The hand-off is an
/// ownership transfer: no concurrent writer remains once the orchestrator
/// holds the buffer.
#[derive(Debug, Default)]
pub struct PcmBuffer {
    data: Vec<u8>,
}

impl PcmBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for an expected capture length.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Append a chunk of captured bytes.
    pub fn append(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    /// Number of bytes accumulated.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, yielding the raw PCM.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
