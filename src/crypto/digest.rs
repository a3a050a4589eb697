//! Plaintext integrity digest.
//!
//! SHA-256 over the decrypted PCM, rendered as 64 lowercase hex characters.
//! Used only for equality comparison against the stored digest; detects
//! accidental corruption and basic tampering, and is never a key-derivation
//! source.

use sha2::{Digest, Sha256};

/// Length of the hex-encoded digest string.
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute the lowercase hex SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    hex_encode(&digest)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
