//! Injected environment mapping.
//!
//! Resolution never reads process state directly; callers hand it an
//! [`Environment`] built either from the process or from explicit pairs.

use crate::error::ConfigParseError;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Environment variable names recognised by the resolver.
pub mod vars {
    pub const REDIS_HOSTS: &str = "REDIS_HOSTS";
    pub const REDIS_HOST: &str = "REDIS_HOST";
    pub const REDIS_PORT: &str = "REDIS_PORT";
    pub const ASYNX_REDIS_HOST: &str = "ASYNX_REDIS_HOST";
    pub const ASYNX_REDIS_PORT: &str = "ASYNX_REDIS_PORT";
    pub const ASYNX_REDIS_DB: &str = "ASYNX_REDIS_DB";
    pub const ASYNX_BIND: &str = "ASYNX_BIND";
    pub const ASYNX_WORKERS: &str = "ASYNX_WORKERS";
    pub const ASYNX_LOGDIR: &str = "ASYNX_LOGDIR";
    pub const ASYNX_DAEMON_LOGLEVEL: &str = "ASYNX_DAEMON_LOGLEVEL";
    pub const ASYNX_DEBUG_LOGLEVEL: &str = "ASYNX_DEBUG_LOGLEVEL";
    pub const ASYNX_CELERY_BROKER_URL: &str = "ASYNX_CELERY_BROKER_URL";
    pub const ASYNX_CELERY_RESULT_BACKEND: &str = "ASYNX_CELERY_RESULT_BACKEND";
    pub const ASYNX_CELERY_DAEMON_LOGLEVEL: &str = "ASYNX_CELERY_DAEMON_LOGLEVEL";
    pub const ASYNX_CELERY_DEBUG_LOGLEVEL: &str = "ASYNX_CELERY_DEBUG_LOGLEVEL";
    pub const ASYNX_CELERY_LOGDIR: &str = "ASYNX_CELERY_LOGDIR";
    pub const ASYNX_CELERY_POOL: &str = "ASYNX_CELERY_POOL";

    // Deployment file discovery
    pub const ASYNX_CONFIG_PATH: &str = "ASYNX_CONFIG_PATH";
    pub const ASYNX_PROJECT_DIR: &str = "ASYNX_PROJECT_DIR";
    pub const ASYNX_USER_DIR: &str = "ASYNX_USER_DIR";
}

/// An owned snapshot of environment variables.
///
/// Empty values are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// An environment with no variables set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the current process environment.
    ///
    /// Variables that are not valid unicode are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Build an environment from explicit key/value pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set a variable, returning the modified environment.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Look up a variable. Unset and empty variables both yield `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Whether a variable is set to a non-empty value.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Parse an integer variable, failing with the variable name and raw
    /// value when it is not a number or does not fit `T`.
    pub fn parse<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigParseError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        trimmed.parse::<T>().map(Some).map_err(|_| {
            if trimmed.parse::<i128>().is_ok() {
                ConfigParseError::out_of_range(key, raw)
            } else {
                ConfigParseError::not_an_integer(key, raw)
            }
        })
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
