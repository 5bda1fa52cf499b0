//! Common types, response definitions, and errors shared across the secret-helper crates.

pub mod error;
pub mod protocol;

pub use error::CryptoError;
