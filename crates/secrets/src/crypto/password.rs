//! Credential Digests built on bcrypt.
//!
//! A digest looks like `$2b$12$<22-char salt><31-char hash>`: the version,
//! work factor and salt travel inside the string, so nothing else is stored.

use bcrypt::BcryptError;
use common::CryptoError;
use tracing::{debug, warn};

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;

/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// Work factor used when none is configured.
pub const DEFAULT_COST: u32 = 12;

/// Longest password bcrypt can digest without dropping bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// How far above the configured work factor a stored digest may go before
/// comparison refuses to run it.
pub const COST_HEADROOM: u32 = 2;

/// Highest digest cost [`compare_password`] should accept for a helper
/// configured at `configured`.
pub fn max_accepted_cost(configured: u32) -> u32 {
    configured.saturating_add(COST_HEADROOM).min(MAX_COST)
}

/// Hash `plaintext` with a fresh random salt at work factor `cost`.
///
/// Passwords longer than [`MAX_PASSWORD_BYTES`] are refused rather than
/// silently truncated.
///
/// # Errors
///
/// Returns [`CryptoError::Hashing`] if `cost` is out of range, the password is
/// too long, or the primitive fails.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, CryptoError> {
    bcrypt::non_truncating_hash(plaintext, cost).map_err(|e| CryptoError::Hashing(e.to_string()))
}

/// Compare `plaintext` against a stored `digest` in constant time.
///
/// A wrong password and a malformed digest both yield `Ok(false)`, as does a
/// digest whose embedded cost exceeds `max_cost`.
///
/// # Errors
///
/// Returns [`CryptoError::Hashing`] if `plaintext` is longer than
/// [`MAX_PASSWORD_BYTES`] or on an underlying I/O failure.
pub fn compare_password(plaintext: &str, digest: &str, max_cost: u32) -> Result<bool, CryptoError> {
    match digest_cost(digest) {
        None => {
            debug!(digest_len = digest.len(), "rejecting malformed credential digest");
            return Ok(false);
        }
        Some(cost) if cost > max_cost => {
            warn!(cost, max_cost, "refusing credential digest above accepted work factor");
            return Ok(false);
        }
        Some(_) => {}
    }

    match bcrypt::non_truncating_verify(plaintext, digest) {
        Ok(matches) => Ok(matches),
        Err(e) if is_malformed_digest(&e) => {
            debug!(error = %e, digest_len = digest.len(), "rejecting malformed credential digest");
            Ok(false)
        }
        Err(e) => Err(CryptoError::Hashing(e.to_string())),
    }
}

fn is_malformed_digest(err: &BcryptError) -> bool {
    matches!(
        err,
        BcryptError::InvalidCost(_)
            | BcryptError::CostNotAllowed(_)
            | BcryptError::InvalidPrefix(_)
            | BcryptError::InvalidHash(_)
            | BcryptError::InvalidSaltLen(_)
            | BcryptError::InvalidBase64(_)
    )
}

/// Work factor embedded in `digest`, if it parses.
pub fn digest_cost(digest: &str) -> Option<u32> {
    let mut parts = digest.split('$');
    // Leading empty segment before the first `$`.
    if !parts.next()?.is_empty() {
        return None;
    }
    let version = parts.next()?;
    if !matches!(version, "2a" | "2b" | "2x" | "2y") {
        return None;
    }
    let cost = parts.next()?;
    if cost.len() != 2 {
        return None;
    }
    cost.parse().ok()
}

/// Returns `true` if `digest` should be regenerated at work factor `cost`.
///
/// Unparseable digests always need regeneration.
pub fn needs_rehash(digest: &str, cost: u32) -> bool {
    digest_cost(digest) != Some(cost)
}
