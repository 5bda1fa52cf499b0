//! Error taxonomy shared by the secret helper and its callers.

use thiserror::Error;

/// Failure raised by the secret helper.
///
/// Every variant carries the underlying cause message. None of them is worth
/// retrying: a tampered or malformed value fails the same way every time.
///
/// Variants map to a machine-readable code and a process exit status:
/// - [`CryptoError::Encryption`] → `encryption_error` / 3
/// - [`CryptoError::Decryption`] → `decryption_error` / 4
/// - [`CryptoError::Hashing`] → `hashing_error` / 5
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Cipher setup or processing failed while encrypting.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Malformed input, authentication-tag mismatch, or decode failure while decrypting.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The password hashing primitive failed while hashing or comparing.
    #[error("hashing failed: {0}")]
    Hashing(String),
}

impl CryptoError {
    /// Short machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            CryptoError::Encryption(_) => "encryption_error",
            CryptoError::Decryption(_) => "decryption_error",
            CryptoError::Hashing(_) => "hashing_error",
        }
    }

    /// Process exit status used by command-line callers.
    pub fn exit_code(&self) -> u8 {
        match self {
            CryptoError::Encryption(_) => 3,
            CryptoError::Decryption(_) => 4,
            CryptoError::Hashing(_) => 5,
        }
    }
}
