//! Logging for the operator CLI.
//!
//! stdout carries exactly one JSON response per run, so log records go to
//! stderr as flattened JSON lines. They carry no target or span noise and no
//! colour codes, which keeps them greppable when the tool runs in scripts.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` wins over `log_level`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(log_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => EnvFilter::try_new(log_level)
            .map_err(|e| anyhow::anyhow!("invalid --log-level {log_level:?}: {e}"))?,
    };

    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_target(false)
        .with_current_span(false)
        .with_ansi(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging already initialised: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_refused() {
        let first = init("warn");
        let second = init("warn");
        assert!(first.is_err() || second.is_err());
    }
}
