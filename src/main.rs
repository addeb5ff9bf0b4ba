//! Kitchen - a live code playground in the terminal.

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use kitchen::cli::{self, Cli, Commands};
use kitchen::config::KitchenConfig;
use kitchen::{core, logger};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = KitchenConfig::load(&cli)?;
    let cwd = std::env::current_dir().context("Failed to get current working directory")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    match &cli.command {
        Commands::Build { session } => {
            runtime.block_on(cli::build::run_build(&config, session, &cwd))
        }
        Commands::Watch { session } => {
            let (shutdown_tx, shutdown_rx) = crossbeam::channel::bounded(1);
            core::register_shutdown(shutdown_tx);
            runtime.block_on(cli::watch::run_watch(&config, session, &cwd, shutdown_rx))
        }
    }
}
