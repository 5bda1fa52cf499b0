//! Random API keys and verification tokens.
//!
//! Every call draws fresh bytes from the OS CSPRNG; nothing is persisted.

use aes_gcm::aead::{rand_core::RngCore, OsRng};

/// Entropy behind a default secure token.
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// Entropy behind an API key.
pub const API_KEY_BYTES: usize = 32;

/// Return `bytes` random bytes rendered as lowercase hex (`2 * bytes` chars).
pub fn generate_secure_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

/// A [`DEFAULT_TOKEN_BYTES`] token: 64 hex characters.
pub fn generate_default_token() -> String {
    generate_secure_token(DEFAULT_TOKEN_BYTES)
}

/// A new API key: 64 hex characters.
pub fn generate_api_key() -> String {
    generate_secure_token(API_KEY_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn api_keys_are_64_hex_and_unique() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert_eq!(a.len(), 64);
        assert_eq!(b.len(), 64);
        assert!(is_lower_hex(&a));
        assert_ne!(a, b);
    }

    #[test]
    fn token_length_follows_bytes() {
        let t = generate_secure_token(16);
        assert_eq!(t.len(), 32);
        assert!(is_lower_hex(&t));
    }

    #[test]
    fn default_token_is_32_bytes() {
        assert_eq!(generate_default_token().len(), 64);
    }

    #[test]
    fn zero_bytes_gives_empty_token() {
        assert_eq!(generate_secure_token(0), "");
    }
}
