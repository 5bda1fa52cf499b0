//! Configuration loading and validation for the secret helper.
//!
//! Values are read from environment variables once, at process start. There is
//! no fallback key: a missing or malformed `ENCRYPTION_KEY` is a deployment
//! error and loading fails.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::password::{DEFAULT_COST, MAX_COST, MIN_COST};
use crate::key::SecretKey;

/// Validated secret-helper configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Hex-encoded 32-byte AES-256 key. **Required.**
    pub encryption_key: String,

    /// bcrypt work factor for new Credential Digests.
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_bcrypt_cost() -> u32 {
    DEFAULT_COST
}

impl Config {
    /// Load and validate configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENCRYPTION_KEY` is absent or malformed, or if
    /// `BCRYPT_COST` cannot be parsed or is out of range.
    pub fn from_env() -> Result<Self> {
        Self::from_source(config::Environment::default())
    }

    /// Load and validate configuration from an explicit environment source.
    pub fn from_source(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration (is ENCRYPTION_KEY set?)")?;

        c.validate()?;
        Ok(c)
    }

    /// Parse the configured key.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENCRYPTION_KEY` is not 64 hex characters.
    pub fn secret_key(&self) -> Result<SecretKey> {
        SecretKey::from_hex(&self.encryption_key).context("ENCRYPTION_KEY is invalid")
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.encryption_key.trim().is_empty() {
            anyhow::bail!("ENCRYPTION_KEY is required and must not be empty");
        }
        self.secret_key()?;

        if !(MIN_COST..=MAX_COST).contains(&self.bcrypt_cost) {
            anyhow::bail!(
                "BCRYPT_COST must be between {MIN_COST} and {MAX_COST}, got {}",
                self.bcrypt_cost
            );
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("encryption_key", &"[REDACTED]")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}
