//! AES-256-GCM field encryption, bcrypt credential digests, and random tokens.
//!
//! This module is free of configuration and I/O. Callers hand in the key and
//! work factor explicitly; [`crate::SecretHelper`] bundles them.
//!
//! # Protected Text format
//!
//! ```text
//! <hex(iv, 16 bytes)>:<hex(tag, 16 bytes)>:<hex(ciphertext)>
//! ```

pub mod cipher;
pub mod password;
pub mod token;

pub use cipher::{ProtectedText, IV_LEN, KEY_LEN, TAG_LEN};
