//! AES-256-GCM sealing of recording plaintext.
//!
//! One fresh key per recording; the key is never reused across recordings.
//!
//! Sealed payload format:
//! ```text
//! [nonce (12 bytes)] [ciphertext] [GCM authentication tag (16 bytes)]
//! ```
//!
//! The nonce is random per call and embedded in the output, so decryption
//! needs only the sealed payload and the key.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::models::error::AudioVaultError;

/// Nonce length prepended to every sealed payload.
pub const NONCE_LEN: usize = 12;

/// Key length for AES-256.
pub const KEY_LEN: usize = 32;

/// A 256-bit AES-GCM key, exclusively associated with one ciphertext.
#[derive(Clone, PartialEq, Eq)]
pub struct CipherKey([u8; KEY_LEN]);

impl CipherKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let key = Aes256Gcm::generate_key(OsRng);
        Self(key.into())
    }

    /// Base64 encoding of the raw key bytes, for storage beside the ciphertext.
    pub fn encode(&self) -> String {
        BASE64.encode(self.0)
    }

    /// Decode a stored base64 key string.
    pub fn decode(encoded: &str) -> Result<Self, AudioVaultError> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| AudioVaultError::KeyFormat(format!("invalid base64: {e}")))?;
        let raw: [u8; KEY_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            AudioVaultError::KeyFormat(format!("expected {KEY_LEN} key bytes, got {}", b.len()))
        })?;
        Ok(Self(raw))
    }
}

impl std::fmt::Debug for CipherKey {
    // Key material stays out of logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CipherKey(..)")
    }
}

/// Seal `plaintext` under `key`: `nonce || ciphertext || tag`.
pub fn encrypt(plaintext: &[u8], key: &CipherKey) -> Result<Vec<u8>, AudioVaultError> {
    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|e| AudioVaultError::Encryption(format!("cipher init: {e}")))?;
    let nonce = Aes256Gcm::generate_nonce(OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| AudioVaultError::Encryption(e.to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(nonce.as_slice());
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Open a sealed payload. Fails on truncated input, wrong key, or a tag
/// mismatch (tampered ciphertext).
pub fn decrypt(sealed: &[u8], key: &CipherKey) -> Result<Vec<u8>, AudioVaultError> {
    if sealed.len() < NONCE_LEN {
        return Err(AudioVaultError::Decryption(format!(
            "sealed payload too short: expected at least {NONCE_LEN} bytes, got {}",
            sealed.len()
        )));
    }

    let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|e| AudioVaultError::Decryption(format!("cipher init: {e}")))?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| {
            AudioVaultError::Decryption("authentication failed: wrong key or corrupted data".into())
        })
}
