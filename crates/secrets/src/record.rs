//! Field-level protection of JSON records before they are persisted.
//!
//! Paths use dot notation; a `[]` suffix fans out over every element of an
//! array, e.g. `"documents[].reference"` →
//! `[Key("documents"), ArrayItem, Key("reference")]`.

use std::collections::BTreeSet;

use common::CryptoError;
use serde_json::Value;
use tracing::debug;

use crate::helper::SecretHelper;

/// Set of dot-notation paths naming the sensitive fields of a record.
pub type FieldPaths = BTreeSet<String>;

/// Segments of a dot-notation field path.
#[derive(Debug, PartialEq, Eq)]
enum PathSegment {
    /// Navigate into an object property by name.
    Key(String),
    /// Expand into every element of a JSON array.
    ArrayItem,
}

fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        if let Some(key) = part.strip_suffix("[]") {
            segments.push(PathSegment::Key(key.to_owned()));
            segments.push(PathSegment::ArrayItem);
        } else {
            segments.push(PathSegment::Key(part.to_owned()));
        }
    }
    segments
}

/// Walk `value` along `segments` and rewrite every string leaf with `f`.
/// Returns the number of leaves rewritten.
fn transform_at_path<F>(
    value: &mut Value,
    segments: &[PathSegment],
    f: &mut F,
) -> Result<usize, CryptoError>
where
    F: FnMut(&str) -> Result<Option<String>, CryptoError>,
{
    let Some((head, rest)) = segments.split_first() else {
        if let Value::String(s) = value {
            if let Some(replacement) = f(s.as_str())? {
                *s = replacement;
                return Ok(1);
            }
        }
        return Ok(0);
    };

    let mut touched = 0;
    match head {
        PathSegment::Key(key) => {
            if let Value::Object(map) = value {
                if let Some(child) = map.get_mut(key) {
                    touched += transform_at_path(child, rest, f)?;
                }
            }
        }
        PathSegment::ArrayItem => {
            if let Value::Array(arr) = value {
                for item in arr.iter_mut() {
                    touched += transform_at_path(item, rest, f)?;
                }
            }
        }
    }
    Ok(touched)
}

/// Apply `f` at every path on a working copy; `payload` is only replaced when
/// every leaf succeeded.
fn transform_fields<F>(
    payload: &mut Value,
    paths: &FieldPaths,
    mut f: F,
) -> Result<usize, CryptoError>
where
    F: FnMut(&str) -> Result<Option<String>, CryptoError>,
{
    let mut working = payload.clone();
    let mut touched = 0;
    for path in paths {
        touched += transform_at_path(&mut working, &parse_path(path), &mut f)?;
    }
    *payload = working;
    Ok(touched)
}

/// Replace every string field named by `paths` with its Protected Text.
///
/// Missing paths and non-string leaves are left untouched. A leaf counts as
/// already protected only if it authenticates under the helper's key; a value
/// that merely has the Protected Text shape is encrypted like any other.
///
/// # Errors
///
/// Returns [`CryptoError::Encryption`] if any field fails; `payload` is then
/// left unchanged.
pub fn protect_fields(
    helper: &SecretHelper,
    payload: &mut Value,
    paths: &FieldPaths,
) -> Result<usize, CryptoError> {
    let touched = transform_fields(payload, paths, |s| {
        if helper.decrypt(s).is_ok() {
            return Ok(None);
        }
        helper.encrypt(s).map(Some)
    })?;
    debug!(fields = touched, "protected record fields");
    Ok(touched)
}

/// Decrypt every Protected Text field named by `paths`.
///
/// # Errors
///
/// Returns [`CryptoError::Decryption`] if any named string field fails to
/// decrypt; `payload` is then left unchanged.
pub fn reveal_fields(
    helper: &SecretHelper,
    payload: &mut Value,
    paths: &FieldPaths,
) -> Result<usize, CryptoError> {
    let touched = transform_fields(payload, paths, |s| helper.decrypt(s).map(Some))?;
    debug!(fields = touched, "revealed record fields");
    Ok(touched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::cipher::is_protected;
    use crate::crypto::password::MIN_COST;
    use crate::key::SecretKey;
    use serde_json::json;

    fn helper() -> SecretHelper {
        SecretHelper::new(SecretKey::from_bytes(&[0x42; 32]).unwrap(), MIN_COST).unwrap()
    }

    fn paths(list: &[&str]) -> FieldPaths {
        list.iter().map(|p| (*p).to_owned()).collect()
    }

    #[test]
    fn parse_path_flat() {
        assert_eq!(parse_path("national_id"), vec![PathSegment::Key("national_id".into())]);
    }

    #[test]
    fn parse_path_nested() {
        assert_eq!(parse_path("student.bank.account").len(), 3);
    }

    #[test]
    fn parse_path_array() {
        let segs = parse_path("documents[].reference");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[1], PathSegment::ArrayItem);
    }

    #[test]
    fn protect_flat_field() {
        let h = helper();
        let mut val = json!({"national_id": "AB123456C", "name": "Ada"});
        let n = protect_fields(&h, &mut val, &paths(&["national_id"])).unwrap();
        assert_eq!(n, 1);
        assert!(is_protected(val["national_id"].as_str().unwrap()));
        assert_eq!(val["name"], "Ada");
    }

    #[test]
    fn protect_and_reveal_array_field() {
        let h = helper();
        let original = json!({
            "documents": [
                {"reference": "uploads/transcript.pdf"},
                {"reference": "uploads/passport.png"}
            ]
        });
        let p = paths(&["documents[].reference"]);
        let mut val = original.clone();
        assert_eq!(protect_fields(&h, &mut val, &p).unwrap(), 2);
        for doc in val["documents"].as_array().unwrap() {
            assert!(is_protected(doc["reference"].as_str().unwrap()));
        }
        reveal_fields(&h, &mut val, &p).unwrap();
        assert_eq!(val, original);
    }

    #[test]
    fn already_protected_is_not_double_encrypted() {
        let h = helper();
        let mut val = json!({"iban": "GB33BUKB20201555555555"});
        let p = paths(&["iban"]);
        protect_fields(&h, &mut val, &p).unwrap();
        let once = val.clone();
        assert_eq!(protect_fields(&h, &mut val, &p).unwrap(), 0);
        assert_eq!(val, once);
    }

    #[test]
    fn lookalike_protected_text_is_still_encrypted() {
        let h = helper();
        let lookalike = format!("{}:{}:41414141", "00".repeat(16), "11".repeat(16));
        assert!(is_protected(&lookalike));

        let mut val = json!({"iban": lookalike.clone()});
        let p = paths(&["iban"]);
        assert_eq!(protect_fields(&h, &mut val, &p).unwrap(), 1);
        assert_ne!(val["iban"], lookalike.as_str());

        reveal_fields(&h, &mut val, &p).unwrap();
        assert_eq!(val["iban"], lookalike.as_str());
    }

    #[test]
    fn value_protected_under_another_key_is_reencrypted() {
        let other = SecretHelper::new(SecretKey::generate(), MIN_COST).unwrap();
        let foreign = other.encrypt("GB33BUKB20201555555555").unwrap();

        let h = helper();
        let mut val = json!({"iban": foreign.clone()});
        let p = paths(&["iban"]);
        assert_eq!(protect_fields(&h, &mut val, &p).unwrap(), 1);
        reveal_fields(&h, &mut val, &p).unwrap();
        assert_eq!(val["iban"], foreign.as_str());
    }

    #[test]
    fn missing_and_non_string_fields_are_noops() {
        let h = helper();
        let mut val = json!({"name": "Bob", "gpa": 3.9});
        let n = protect_fields(&h, &mut val, &paths(&["ssn", "gpa"])).unwrap();
        assert_eq!(n, 0);
        assert_eq!(val, json!({"name": "Bob", "gpa": 3.9}));
    }

    #[test]
    fn reveal_failure_leaves_payload_untouched() {
        let h = helper();
        let mut val = json!({"a": "x", "b": "not-protected"});
        protect_fields(&h, &mut val, &paths(&["a"])).unwrap();
        let before = val.clone();
        let err = reveal_fields(&h, &mut val, &paths(&["a", "b"])).unwrap_err();
        assert!(matches!(err, CryptoError::Decryption(_)));
        assert_eq!(val, before);
    }
}
