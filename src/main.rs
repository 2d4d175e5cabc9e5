//! resdeploy - push-to-deploy bridge for game server resources.
//!
//! Pulls the server data on a signed webhook delivery and refreshes the
//! server, and restarts individual resources as their files change.

mod actor;
mod cli;
mod config;
mod core;
mod logger;
mod rcon;
mod resource;
mod utils;
mod webhook;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{BridgeConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(BridgeConfig::load(cli)?);
    debug!("config"; "{}", config.config_path.display());

    match &cli.command {
        Commands::Serve { .. } => cli::serve::serve(&config),
        Commands::Refresh => cli::console::refresh(&config),
        Commands::Restart { resources } => cli::console::restart(&config, resources),
        Commands::Resolve { paths } => cli::console::resolve(&config, paths),
    }
}
