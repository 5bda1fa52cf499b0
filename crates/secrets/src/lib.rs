//! Credential and secret protection for the scholarship service.
//!
//! - [`crypto::cipher`]: reversible AES-256-GCM encryption of sensitive field
//!   values into Protected Text (`<iv>:<tag>:<ciphertext>`, hex).
//! - [`crypto::password`]: one-way bcrypt Credential Digests for account passwords.
//! - [`crypto::token`]: CSPRNG API keys and verification tokens.
//! - [`SecretHelper`]: the injected handle request code holds; it owns the
//!   process key and the configured work factor.
//!
//! The helper never reads the environment. Configuration is loaded once at
//! process start through [`Config`] and passed in explicitly.

pub mod config;
pub mod crypto;
pub mod helper;
pub mod key;
pub mod record;

pub use common::CryptoError;
pub use crate::config::Config;
pub use helper::SecretHelper;
pub use key::{KeyError, SecretKey};
