//! [`SecretKey`]: the process-wide AES-256 key.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::KEY_LEN;

/// Errors produced while loading key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The key string is not valid hexadecimal.
    #[error("key is not valid hex: {0}")]
    InvalidHex(String),

    /// The decoded key material has an unexpected length.
    #[error("key has invalid length: expected {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// Fixed-size key buffer holding exactly [`KEY_LEN`] bytes.
///
/// The buffer is overwritten with zeroes on drop.
#[derive(Clone)]
pub struct SecretKey(Zeroizing<[u8; KEY_LEN]>);

impl SecretKey {
    /// Copy key material out of `bytes`, which must be exactly [`KEY_LEN`] long.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidLength`] if the slice has the wrong length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != KEY_LEN {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        let mut buf = Zeroizing::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Parse a key from its 64-character hex form. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidHex`] or [`KeyError::InvalidLength`].
    pub fn from_hex(encoded: &str) -> Result<Self, KeyError> {
        let decoded = Zeroizing::new(
            hex::decode(encoded.trim()).map_err(|e| KeyError::InvalidHex(e.to_string()))?,
        );
        Self::from_bytes(&decoded)
    }

    /// Generate a new key from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut buf = Zeroizing::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(&mut buf[..]);
        Self(buf)
    }

    /// Hex rendering of the key, for provisioning output only.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0[..])
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("SecretKey([REDACTED])")
    }
}
