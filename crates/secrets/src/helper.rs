//! [`SecretHelper`]: the injected handle request code uses to protect secrets.

use std::sync::Arc;

use anyhow::Result;
use common::CryptoError;
use tracing::{debug, info};

use crate::config::Config;
use crate::crypto::{cipher, password, token};
use crate::key::SecretKey;

/// Encrypts sensitive field values, digests passwords, and mints random tokens.
///
/// Holds the process key behind an [`Arc`] and never mutates it, so clones are
/// cheap and concurrent use from many request handlers needs no locking.
#[derive(Clone, Debug)]
pub struct SecretHelper {
    key: Arc<SecretKey>,
    bcrypt_cost: u32,
}

impl SecretHelper {
    /// Create a helper from an explicit key and bcrypt work factor.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Hashing`] if `bcrypt_cost` is outside
    /// [`password::MIN_COST`]..=[`password::MAX_COST`].
    pub fn new(key: SecretKey, bcrypt_cost: u32) -> Result<Self, CryptoError> {
        if !(password::MIN_COST..=password::MAX_COST).contains(&bcrypt_cost) {
            return Err(CryptoError::Hashing(format!(
                "work factor {bcrypt_cost} outside {}..={}",
                password::MIN_COST,
                password::MAX_COST
            )));
        }
        Ok(Self {
            key: Arc::new(key),
            bcrypt_cost,
        })
    }

    /// Create a helper from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured key or work factor is invalid.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let helper = Self::new(cfg.secret_key()?, cfg.bcrypt_cost)?;
        info!(bcrypt_cost = cfg.bcrypt_cost, "secret helper initialised");
        Ok(helper)
    }

    /// Configured bcrypt work factor.
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    /// Encrypt `plaintext` into Protected Text.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encryption`] if the cipher fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        cipher::encrypt_str(plaintext, self.key.as_bytes())
    }

    /// Decrypt Protected Text back into the original plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Decryption`] for malformed input, a tag mismatch
    /// (tampered data or a different key), or a decode failure.
    pub fn decrypt(&self, protected: &str) -> Result<String, CryptoError> {
        cipher::decrypt_str(protected, self.key.as_bytes()).inspect_err(|e| {
            debug!(error = %e, input_len = protected.len(), "decrypt rejected");
        })
    }

    /// Produce a Credential Digest for `plaintext` at the configured work factor.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Hashing`] if the primitive fails.
    pub fn hash_password(&self, plaintext: &str) -> Result<String, CryptoError> {
        password::hash_password(plaintext, self.bcrypt_cost)
    }

    /// Compare `plaintext` against a stored Credential Digest.
    ///
    /// Mismatch, malformed digests, and digests whose cost is more than
    /// [`password::COST_HEADROOM`] above the configured work factor are `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Hashing`] if `plaintext` is longer than
    /// [`password::MAX_PASSWORD_BYTES`] or the primitive itself fails.
    pub fn compare_password(&self, plaintext: &str, digest: &str) -> Result<bool, CryptoError> {
        password::compare_password(
            plaintext,
            digest,
            password::max_accepted_cost(self.bcrypt_cost),
        )
    }

    /// Returns `true` if `digest` was produced at a different work factor.
    pub fn needs_rehash(&self, digest: &str) -> bool {
        password::needs_rehash(digest, self.bcrypt_cost)
    }

    /// A new 64-hex-character API key.
    pub fn generate_api_key(&self) -> String {
        token::generate_api_key()
    }

    /// `bytes` random bytes as hex.
    pub fn generate_secure_token(&self, bytes: usize) -> String {
        token::generate_secure_token(bytes)
    }
}
