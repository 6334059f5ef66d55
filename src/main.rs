//! Main application entry point (server binary).
//!
//! This is a thin wrapper around the `ginkohub_tools` library that handles:
//! - Environment variable loading (.env file)
//! - Command-line argument parsing
//! - Logger initialization
//!
//! All routes and state live in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use ginkohub_tools::initialization::init_logger_with;
use ginkohub_tools::{run_server, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    if let Err(e) = run_server(config).await {
        eprintln!("ginkohub_tools error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
