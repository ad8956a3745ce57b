//! `show` command: print the resolved settings.

use crate::config::{ConfigLoader, Environment};
use crate::format::{OutputFormat, format_settings};
use anyhow::{Context, Result};
use clap::Args;

/// Arguments for the show command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Run the show command.
pub fn run_show(loader: &ConfigLoader, env: &Environment, args: &ShowArgs) -> Result<()> {
    let settings = loader
        .resolve(env)
        .context("failed to resolve settings")?;
    let out = format_settings(&settings, args.format)?;
    print!("{}", out);
    if !out.ends_with('\n') {
        println!();
    }
    Ok(())
}
