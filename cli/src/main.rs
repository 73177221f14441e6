//! `validate-skills`: structural checks for Agent Skill packages.
//!
//! Reports go to stdout, logs go to stderr. See the library docs for flags.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use skillcheck_cli::{Args, run};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let outcome = run(&args).await?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(outcome.output.as_bytes())?;
    stdout.flush()?;

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
