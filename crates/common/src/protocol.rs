//! JSON bodies printed by the operator tool.
//!
//! Each command writes exactly one of these objects to stdout so the output can
//! be piped into other tooling.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Key and token generation
// ---------------------------------------------------------------------------

/// Output of `gen-key`: a freshly generated `ENCRYPTION_KEY` value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResponse {
    /// 64 lowercase hex characters (32 bytes).
    pub key: String,
}

/// Output of `api-key` and `token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Lowercase hex rendering of the random bytes.
    pub token: String,
    /// Number of random bytes behind `token`.
    pub bytes: usize,
}

// ---------------------------------------------------------------------------
// Credential digests
// ---------------------------------------------------------------------------

/// Output of `hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestResponse {
    /// bcrypt digest embedding version, cost and salt.
    pub digest: String,
}

/// Output of `verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub matches: bool,
    /// `true` when the digest should be regenerated with the configured cost.
    pub needs_rehash: bool,
}

// ---------------------------------------------------------------------------
// Protected text
// ---------------------------------------------------------------------------

/// Output of `encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedResponse {
    /// `<hex iv>:<hex tag>:<hex ciphertext>`.
    pub protected: String,
}

/// Output of `decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaintextResponse {
    pub plaintext: String,
}

/// Output of `seal` and `open`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResponse {
    /// The input record with the selected fields transformed.
    pub payload: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Body printed when a command fails with a [`crate::CryptoError`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"decryption_error"`).
    pub code: String,
    /// Human-readable description. Never contains secret material.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::CryptoError> for ErrorResponse {
    fn from(err: &crate::CryptoError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}
