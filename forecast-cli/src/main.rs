//! Binary crate for the `forecast` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup
//! - Reporting failures and the exit status

use clap::Parser;
use crossterm::style::Stylize;
use forecast_core::{Config, ForecastError};
use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cmd = cli::Cli::parse();
    let color = cmd.color_enabled(io::stderr().is_terminal());

    match cmd.run(Config::from_env()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let msg = match err.downcast_ref::<ForecastError>() {
                Some(forecast_err) => forecast_err.user_message(),
                None => format!("{err:#}"),
            };
            if color {
                eprintln!("{}", msg.red());
            } else {
                eprintln!("{msg}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they never mix with the forecast on stdout.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}
