//! Command execution: turns a parsed [`Command`] into one JSON response.

use std::io::Read;

use anyhow::{Context, Result};
use common::protocol::{
    DigestResponse, ErrorResponse, KeyResponse, PlaintextResponse, ProtectedResponse, RecordResponse,
    TokenResponse, VerifyResponse,
};
use common::CryptoError;
use secrets::crypto::token::API_KEY_BYTES;
use secrets::record::{self, FieldPaths};
use secrets::{Config, SecretHelper, SecretKey};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::Command;

/// Result of a command that ran to completion.
#[derive(Debug)]
pub enum Outcome {
    /// Serialised JSON response body.
    Done(String),
    /// The secret helper rejected the input.
    Failed(CryptoError),
}

impl Outcome {
    /// Response body for stdout and the process exit status.
    ///
    /// Failures are rendered as an [`ErrorResponse`] and exit with
    /// [`CryptoError::exit_code`].
    pub fn render(self) -> Result<(String, u8)> {
        match self {
            Outcome::Done(body) => Ok((body, 0)),
            Outcome::Failed(err) => {
                warn!(code = err.code(), error = %err, "command failed");
                let body = serde_json::to_string(&ErrorResponse::from(&err))
                    .context("failed to serialise error response")?;
                Ok((body, err.exit_code()))
            }
        }
    }
}

/// Load configuration if needed, read stdin, and execute `cmd`.
///
/// # Errors
///
/// Returns an error if configuration is missing or invalid, stdin cannot be
/// read, or a record is not valid JSON. Crypto failures are reported through
/// [`Outcome::Failed`] instead.
pub fn run(cmd: Command) -> Result<Outcome> {
    if !cmd.needs_config() {
        return execute(cmd, None, "");
    }

    let cfg = Config::from_env()?;
    let helper = SecretHelper::from_config(&cfg)?;

    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read stdin")?;

    execute(cmd, Some(&helper), strip_newline(&raw))
}

/// Drop a single trailing line ending left by `echo` or a terminal.
fn strip_newline(raw: &str) -> &str {
    raw.strip_suffix('\n')
        .map(|s| s.strip_suffix('\r').unwrap_or(s))
        .unwrap_or(raw)
}

fn execute(cmd: Command, helper: Option<&SecretHelper>, input: &str) -> Result<Outcome> {
    let configured = || helper.context("command requires ENCRYPTION_KEY configuration");

    match cmd {
        Command::GenKey => {
            info!("generated new encryption key");
            finish(Ok(KeyResponse {
                key: SecretKey::generate().to_hex(),
            }))
        }
        Command::ApiKey => finish(Ok(TokenResponse {
            token: secrets::crypto::token::generate_api_key(),
            bytes: API_KEY_BYTES,
        })),
        Command::Token { bytes } => finish(Ok(TokenResponse {
            token: secrets::crypto::token::generate_secure_token(bytes),
            bytes,
        })),
        Command::Hash => finish(
            configured()?
                .hash_password(input)
                .map(|digest| DigestResponse { digest }),
        ),
        Command::Verify { digest } => {
            let h = configured()?;
            finish(
                h.compare_password(input, &digest)
                    .map(|matches| VerifyResponse {
                        matches,
                        needs_rehash: h.needs_rehash(&digest),
                    }),
            )
        }
        Command::Encrypt => finish(
            configured()?
                .encrypt(input)
                .map(|protected| ProtectedResponse { protected }),
        ),
        Command::Decrypt => finish(
            configured()?
                .decrypt(input.trim())
                .map(|plaintext| PlaintextResponse { plaintext }),
        ),
        Command::Seal { fields } => {
            let h = configured()?;
            let mut payload = parse_record(input)?;
            let paths: FieldPaths = fields.into_iter().collect();
            finish(
                record::protect_fields(h, &mut payload, &paths)
                    .map(|_| RecordResponse { payload }),
            )
        }
        Command::Open { fields } => {
            let h = configured()?;
            let mut payload = parse_record(input)?;
            let paths: FieldPaths = fields.into_iter().collect();
            finish(
                record::reveal_fields(h, &mut payload, &paths)
                    .map(|_| RecordResponse { payload }),
            )
        }
    }
}

fn parse_record(input: &str) -> Result<serde_json::Value> {
    serde_json::from_str(input).context("stdin is not a valid JSON record")
}

fn finish<T: Serialize>(result: Result<T, CryptoError>) -> Result<Outcome> {
    match result {
        Ok(body) => Ok(Outcome::Done(
            serde_json::to_string(&body).context("failed to serialise response")?,
        )),
        Err(e) => Ok(Outcome::Failed(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrets::crypto::password::MIN_COST;
    use serde_json::{json, Value};

    fn helper() -> SecretHelper {
        SecretHelper::new(SecretKey::from_bytes(&[0x11; 32]).unwrap(), MIN_COST).unwrap()
    }

    fn done(outcome: Outcome) -> Value {
        match outcome {
            Outcome::Done(body) => serde_json::from_str(&body).unwrap(),
            Outcome::Failed(e) => panic!("unexpected failure: {e}"),
        }
    }

    #[test]
    fn strip_newline_variants() {
        assert_eq!(strip_newline("pw\n"), "pw");
        assert_eq!(strip_newline("pw\r\n"), "pw");
        assert_eq!(strip_newline("pw"), "pw");
        assert_eq!(strip_newline("pw\n\n"), "pw\n");
    }

    #[test]
    fn gen_key_needs_no_helper() {
        let body = done(execute(Command::GenKey, None, "").unwrap());
        let key = body["key"].as_str().unwrap();
        assert!(SecretKey::from_hex(key).is_ok());
    }

    #[test]
    fn token_reports_requested_bytes() {
        let body = done(execute(Command::Token { bytes: 16 }, None, "").unwrap());
        assert_eq!(body["bytes"], 16);
        assert_eq!(body["token"].as_str().unwrap().len(), 32);
    }

    #[test]
    fn encrypt_without_config_is_an_error() {
        assert!(execute(Command::Encrypt, None, "x").is_err());
    }

    #[test]
    fn encrypt_then_decrypt() {
        let h = helper();
        let enc = done(execute(Command::Encrypt, Some(&h), "hello").unwrap());
        let protected = enc["protected"].as_str().unwrap();
        let dec = done(execute(Command::Decrypt, Some(&h), protected).unwrap());
        assert_eq!(dec["plaintext"], "hello");
    }

    #[test]
    fn decrypt_garbage_reports_failure() {
        let h = helper();
        match execute(Command::Decrypt, Some(&h), "a:b").unwrap() {
            Outcome::Failed(e) => assert_eq!(e.code(), "decryption_error"),
            Outcome::Done(body) => panic!("unexpected success: {body}"),
        }
    }

    #[test]
    fn success_renders_body_with_status_zero() {
        let (body, status) = Outcome::Done("{}".to_owned()).render().unwrap();
        assert_eq!(body, "{}");
        assert_eq!(status, 0);
    }

    #[test]
    fn failures_render_error_body_and_exit_code() {
        let h = helper();
        let (body, status) = execute(Command::Decrypt, Some(&h), "a:b")
            .unwrap()
            .render()
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.code, "decryption_error");
        assert_eq!(status, CryptoError::Decryption(String::new()).exit_code());

        let (_, status) = Outcome::Failed(CryptoError::Hashing("x".into()))
            .render()
            .unwrap();
        assert_eq!(status, 5);
    }

    #[test]
    fn hash_then_verify() {
        let h = helper();
        let hashed = done(execute(Command::Hash, Some(&h), "s3cret").unwrap());
        let digest = hashed["digest"].as_str().unwrap().to_owned();

        let ok = done(execute(Command::Verify { digest: digest.clone() }, Some(&h), "s3cret").unwrap());
        assert_eq!(ok, json!({"matches": true, "needs_rehash": false}));

        let bad = done(execute(Command::Verify { digest }, Some(&h), "nope").unwrap());
        assert_eq!(bad["matches"], false);
    }

    #[test]
    fn seal_and_open_record() {
        let h = helper();
        let record = json!({"student": {"national_id": "AB123456C"}}).to_string();
        let fields = vec!["student.national_id".to_owned()];

        let sealed = done(execute(Command::Seal { fields: fields.clone() }, Some(&h), &record).unwrap());
        let sealed_payload = sealed["payload"].to_string();
        assert_ne!(sealed["payload"]["student"]["national_id"], "AB123456C");

        let opened = done(execute(Command::Open { fields }, Some(&h), &sealed_payload).unwrap());
        assert_eq!(opened["payload"]["student"]["national_id"], "AB123456C");
    }

    #[test]
    fn seal_rejects_invalid_json() {
        let h = helper();
        let fields = vec!["x".to_owned()];
        assert!(execute(Command::Seal { fields }, Some(&h), "{not json").is_err());
    }
}
