//! Command-line interface definition.

use clap::{Parser, Subcommand};
use secrets::crypto::token::DEFAULT_TOKEN_BYTES;

/// Provision keys and protect secrets for the scholarship service.
#[derive(Debug, Parser)]
#[command(name = "keytool")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a new ENCRYPTION_KEY value
    GenKey,
    /// Generate a new API key
    ApiKey,
    /// Generate a random hex token
    Token {
        /// Bytes of entropy (the token has twice as many hex characters)
        #[arg(long, default_value_t = DEFAULT_TOKEN_BYTES, value_parser = parse_token_bytes)]
        bytes: usize,
    },
    /// Hash the password read from stdin
    Hash,
    /// Compare the password read from stdin against a digest
    Verify {
        /// Stored credential digest
        #[arg(long)]
        digest: String,
    },
    /// Encrypt the plaintext read from stdin
    Encrypt,
    /// Decrypt the protected text read from stdin
    Decrypt,
    /// Protect fields of the JSON record read from stdin
    Seal {
        /// Dot-notation field path; `[]` fans out over arrays
        #[arg(long = "field", required = true)]
        fields: Vec<String>,
    },
    /// Reveal fields of the JSON record read from stdin
    Open {
        /// Dot-notation field path; `[]` fans out over arrays
        #[arg(long = "field", required = true)]
        fields: Vec<String>,
    },
}

fn parse_token_bytes(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_owned()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl Command {
    /// Returns `true` if the command needs the configured key and work factor.
    pub fn needs_config(&self) -> bool {
        !matches!(self, Command::GenKey | Command::ApiKey | Command::Token { .. })
    }
}
