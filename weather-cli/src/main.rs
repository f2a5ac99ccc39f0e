//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Interactive prompts (search mode, place query or coordinates)
//! - Driving the geocode -> weather pipeline once per run
//! - Human-friendly output formatting

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod prompt;
mod render;
mod session;

// One lookup per run, each request awaited before the next is sent.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

/// Logs go to stderr so prompts and results on stdout stay clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
