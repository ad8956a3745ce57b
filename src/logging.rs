//! Logging setup and level-name handling.
//!
//! The task-queue runtime names its levels `DEBUG`, `INFO`, `WARNING`,
//! `ERROR` and `CRITICAL` (or their numeric values 10..50). This module maps
//! those names onto `tracing` levels and installs the process subscriber.

use anyhow::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stdout,
    Stderr,
    /// Append to a file
    File(PathBuf),
}

impl LogTarget {
    /// Parse `0/off`, `1/stdout`, `2/stderr`, or treat anything else as a file name.
    pub fn parse(s: &str) -> Self {
        match s {
            "0" | "off" => LogTarget::Off,
            "1" | "stdout" => LogTarget::Stdout,
            "2" | "stderr" => LogTarget::Stderr,
            filename => LogTarget::File(PathBuf::from(filename)),
        }
    }
}

/// Map a task-queue level name onto a tracing level.
///
/// `CRITICAL` and `FATAL` have no tracing counterpart and map to `ERROR`.
/// Returns `None` for names the task-queue runtime would reject.
pub fn level_from_name(name: &str) -> Option<Level> {
    match name.trim().to_ascii_uppercase().as_str() {
        "DEBUG" | "10" => Some(Level::DEBUG),
        "INFO" | "20" => Some(Level::INFO),
        "WARNING" | "WARN" | "30" => Some(Level::WARN),
        "ERROR" | "40" => Some(Level::ERROR),
        "CRITICAL" | "FATAL" | "50" => Some(Level::ERROR),
        _ => None,
    }
}

/// `RUST_LOG` directives if present, otherwise everything at `level` and above.
fn filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Install the global subscriber.
pub fn init(target: &LogTarget, level: Level) -> Result<()> {
    match target {
        LogTarget::Off => {}
        LogTarget::Stdout => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter(level))
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::Stderr => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter(level))
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter(level))
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}
