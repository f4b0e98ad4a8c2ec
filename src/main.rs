use std::{io::stderr, process::ExitCode};

use tracing_subscriber::EnvFilter;

mod cli;
mod manifest;
mod metadata;

fn main() -> ExitCode {
    // stdout carries the manifest
    tracing_subscriber::fmt()
        .with_writer(stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(error) = cli::execute() {
        eprintln!("Error: {error:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
