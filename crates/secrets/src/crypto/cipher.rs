//! AES-256-GCM encryption and decryption of individual field values.
//!
//! A fresh 128-bit IV is drawn from the OS CSPRNG on every call. GCM breaks
//! both confidentiality and authentication under IV reuse, so no API here
//! accepts a caller-supplied IV.

use std::fmt;
use std::str::FromStr;

use aes_gcm::{
    aead::{consts::U16, rand_core::RngCore, AeadInPlace, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Nonce, Tag,
};
use common::CryptoError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of the IV (16 bytes = 128 bits).
pub const IV_LEN: usize = 16;

/// Byte length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

const DELIMITER: char = ':';

/// AES-256-GCM with a 16-byte IV.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// A parsed, encrypted field value.
///
/// The string representation is `<hex(iv)>:<hex(tag)>:<hex(ciphertext)>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedText {
    /// Raw IV bytes.
    pub iv: [u8; IV_LEN],
    /// Raw authentication tag bytes.
    pub tag: [u8; TAG_LEN],
    /// Raw ciphertext bytes, same length as the plaintext.
    pub ciphertext: Vec<u8>,
}

impl fmt::Display for ProtectedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}",
            hex::encode(self.iv),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext),
        )
    }
}

impl FromStr for ProtectedText {
    type Err = CryptoError;

    /// Parse a Protected Text string.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Decryption`] unless the input has exactly three
    /// colon-delimited hex parts with a 16-byte IV and a 16-byte tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(DELIMITER).collect();
        if parts.len() != 3 {
            return Err(CryptoError::Decryption(format!(
                "expected 3 colon-delimited parts, got {}",
                parts.len()
            )));
        }
        let iv = decode_fixed::<IV_LEN>(parts[0], "iv")?;
        let tag = decode_fixed::<TAG_LEN>(parts[1], "tag")?;
        let ciphertext = hex::decode(parts[2])
            .map_err(|e| CryptoError::Decryption(format!("ciphertext is not valid hex: {e}")))?;

        Ok(Self { iv, tag, ciphertext })
    }
}

fn decode_fixed<const N: usize>(part: &str, what: &str) -> Result<[u8; N], CryptoError> {
    let bytes = hex::decode(part)
        .map_err(|e| CryptoError::Decryption(format!("{what} is not valid hex: {e}")))?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        CryptoError::Decryption(format!(
            "{what} has invalid length: expected {N} bytes, got {}",
            bytes.len()
        ))
    })
}

/// Returns `true` if `value` is structurally a Protected Text.
///
/// Does not authenticate anything; use it to tell already-protected values
/// apart from legacy plaintext.
pub fn is_protected(value: &str) -> bool {
    value.parse::<ProtectedText>().is_ok()
}

/// Encrypt `plaintext` under `key` with a fresh random IV.
///
/// # Errors
///
/// Returns [`CryptoError::Encryption`] if `key` is not [`KEY_LEN`] bytes, if
/// the OS CSPRNG fails, or on an internal AEAD error. No partial output is
/// ever returned.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<ProtectedText, CryptoError> {
    let cipher = build_cipher(key).map_err(CryptoError::Encryption)?;

    let mut iv = [0u8; IV_LEN];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|e| CryptoError::Encryption(format!("iv generation failed: {e}")))?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buffer)
        .map_err(|_| CryptoError::Encryption("aead operation failed".into()))?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(tag.as_slice());

    Ok(ProtectedText {
        iv,
        tag: tag_bytes,
        ciphertext: buffer,
    })
}

/// Decrypt a [`ProtectedText`] back to plaintext bytes.
///
/// # Errors
///
/// Returns [`CryptoError::Decryption`] if `key` is not [`KEY_LEN`] bytes or if
/// authentication fails (wrong key or tampered data).
pub fn decrypt(protected: &ProtectedText, key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = build_cipher(key).map_err(CryptoError::Decryption)?;

    let mut buffer = protected.ciphertext.clone();
    cipher
        .decrypt_in_place_detached(
            Nonce::<U16>::from_slice(&protected.iv),
            b"",
            &mut buffer,
            Tag::from_slice(&protected.tag),
        )
        .map_err(|_| CryptoError::Decryption("authentication tag mismatch".into()))?;
    Ok(buffer)
}

/// Encrypt a UTF-8 string and render it as Protected Text.
pub fn encrypt_str(plaintext: &str, key: &[u8]) -> Result<String, CryptoError> {
    encrypt(plaintext.as_bytes(), key).map(|p| p.to_string())
}

/// Parse and decrypt Protected Text back into the original string.
///
/// # Errors
///
/// Returns [`CryptoError::Decryption`] on any parse or authentication failure,
/// or if the recovered bytes are not valid UTF-8.
pub fn decrypt_str(protected: &str, key: &[u8]) -> Result<String, CryptoError> {
    let parsed: ProtectedText = protected.parse()?;
    let bytes = decrypt(&parsed, key)?;
    String::from_utf8(bytes)
        .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".into()))
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm16, String> {
    if key.len() != KEY_LEN {
        return Err(format!(
            "invalid key length: expected {KEY_LEN} bytes, got {}",
            key.len()
        ));
    }
    Aes256Gcm16::new_from_slice(key).map_err(|_| "invalid key length".to_owned())
}
