//! asynx-config
//!
//! Resolves the asynx task-queue settings from the environment and
//! deployment files, then prints or validates them.

use anyhow::{Context, Result};
use asynx_config::cli::{Cli, Command, check, show};
use asynx_config::config::{ConfigLoader, ConfigPaths, Environment};
use asynx_config::logging::{self, LogTarget};
use clap::Parser;
use tracing::{Level, debug};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    logging::init(&LogTarget::parse(&cli.log), level)?;

    // The only read of process state; everything below works on this snapshot.
    let env = Environment::from_process();
    debug!(count = env.len(), "Captured environment");

    let loader = if cli.no_files {
        ConfigLoader::empty()
    } else if let Some(path) = &cli.config {
        ConfigLoader::load_with_paths(ConfigPaths::explicit(path))
            .with_context(|| format!("failed to load deployment file {}", path))?
    } else {
        ConfigLoader::load(&env).context("failed to load deployment configuration")?
    };

    match cli.command {
        Command::Show(args) => show::run_show(&loader, &env, &args)?,
        Command::Check => check::run_check(&loader, &env)?,
    }

    Ok(())
}
