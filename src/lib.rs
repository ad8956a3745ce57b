//! asynx task-queue configuration library
//!
//! Resolves the settings consumed by the asynx task-queue runtime.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;

pub use config::{ConfigResolver, Environment, Settings, resolve};
pub use error::{ConfigError, ConfigParseError};
