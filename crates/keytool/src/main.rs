//! `keytool`: operator CLI entry point.
//!
//! Startup sequence:
//! 1. Parse command-line arguments.
//! 2. Initialise structured JSON logging on stderr.
//! 3. For commands that touch stored secrets, load and validate [`secrets::Config`]
//!    from environment variables and build the [`secrets::SecretHelper`].
//! 4. Run the command and print one JSON object to stdout.

mod cli;
mod commands;
mod telemetry;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use cli::Cli;

fn main() -> Result<ExitCode> {
    // -----------------------------------------------------------------------
    // 1. Arguments
    // -----------------------------------------------------------------------
    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cli.log_level)?;

    // -----------------------------------------------------------------------
    // 3 + 4. Configuration and command
    // -----------------------------------------------------------------------
    let (body, status) = commands::run(cli.command)?.render()?;
    println!("{body}");
    Ok(ExitCode::from(status))
}
