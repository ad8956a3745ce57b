//! Error types for configuration resolution.

use std::path::PathBuf;
use thiserror::Error;

/// A value that could not be turned into a setting.
///
/// Always fatal: startup must not proceed with a partially resolved snapshot.
/// `variable` is the environment variable name, or the dotted key of a
/// deployment file entry (e.g. `server.workers`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for {variable}: {value:?} ({reason})")]
pub struct ConfigParseError {
    pub variable: String,
    pub value: String,
    pub reason: String,
}

impl ConfigParseError {
    pub fn new(
        variable: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            variable: variable.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    // Convenience constructors

    pub fn not_an_integer(variable: &str, value: &str) -> Self {
        Self::new(variable, value, "expected an integer")
    }

    pub fn out_of_range(variable: &str, value: &str) -> Self {
        Self::new(variable, value, "integer out of range")
    }

    pub fn not_positive(variable: &str, value: &str) -> Self {
        Self::new(variable, value, "expected a positive integer")
    }

    pub fn invalid_json(variable: &str, value: &str, err: &serde_json::Error) -> Self {
        Self::new(variable, value, format!("invalid JSON: {}", err))
    }

    pub fn invalid_host_port(variable: &str, value: &str, reason: &str) -> Self {
        Self::new(
            variable,
            value,
            format!("expected a host:port entry, {}", reason),
        )
    }
}

/// Errors raised while loading deployment files or resolving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Parse(#[from] ConfigParseError),

    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The merged deployment tiers do not match the expected layout.
    #[error("invalid deployment configuration: {0}")]
    Shape(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
