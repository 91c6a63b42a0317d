//! # devkit
//!
//! Command-line front end for the `devkit-uuid` and `devkit-sha1` crates.
//!
//! ## Environment
//! - `DEVKIT_DEFAULT_VERSION`: version used by `generate` when none is given (default: "v4")
//! - `DEVKIT_MAX_COUNT`: upper bound for `generate --count` (default: 1000)
//! - `DEVKIT_ENTROPY`: random source, `os` or `uuid` (default: "os")
//! - `DEVKIT_SHA1`: SHA-1 backend, `native` or `bundled` (default: "native")
//! - `RUST_LOG`: log filter (default: "devkit=warn"). Logs go to stderr.
//!
//! A `.env` file in the working directory is loaded first if present.

mod cli;
mod commands;
mod config;

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use config::AppConfig;

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("devkit=warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::debug!(?config, "configuration resolved");

    let mut stdout = std::io::stdout().lock();
    if commands::run(cli.command, &config, &mut stdout)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
