//! CLI command definitions for asynx-config
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod check;
pub mod show;

use clap::{Parser, Subcommand};
use show::ShowArgs;

/// Resolve and inspect asynx task-queue settings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a deployment file (replaces project and user tiers)
    #[arg(short, long, global = true, conflicts_with = "no_files")]
    pub config: Option<String>,

    /// Ignore deployment files, resolve from the environment only
    #[arg(long, global = true)]
    pub no_files: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved settings
    Show(ShowArgs),

    /// Resolve settings and report problems, exiting non-zero on failure
    Check,
}
