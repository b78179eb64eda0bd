//! Keel - Main Entry Point
//!
//! Loads settings, installs logging and dispatches to a subcommand.

mod cli;
mod commands;
mod logging;
mod settings;

use anyhow::Context;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.settings.as_deref()).context("failed to load settings")?;
    logging::init(&settings.log_filter);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting keel");

    match &cli.command {
        Command::Evaluate(args) => commands::evaluate::run(args, &settings).await,
        Command::Pause(args) => commands::pause::run(args, &settings).await,
    }
}
