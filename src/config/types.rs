//! Configuration types and structures.
//!
//! [`Settings`] is the resolved snapshot handed to the task-queue runtime.
//! [`FileConfig`] mirrors the optional deployment files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_REDIS_HOST: &str = "localhost";
pub const DEFAULT_REDIS_PORT: u16 = 6379;
pub const DEFAULT_REDIS_DB: u32 = 0;
pub const DEFAULT_BIND: &str = "0.0.0.0:17969";
pub const DEFAULT_WORKERS: u32 = 4;
pub const DEFAULT_LOG_DIR: &str = "/tmp/asynx-log";
pub const DEFAULT_DAEMON_LOGLEVEL: &str = "INFO";
pub const DEFAULT_DEBUG_LOGLEVEL: &str = "DEBUG";

/// Subdirectory of the log directory used by task-queue workers.
pub const CELERY_LOG_SUBDIR: &str = "celery";

/// Seconds a task result is kept by the result backend.
pub const TASK_RESULT_EXPIRES: u64 = 3600;
pub const TIMEZONE: &str = "UTC";
pub const PREFETCH_MULTIPLIER: u32 = 1;
pub const MAX_TASKS_PER_CHILD: u32 = 1000;

/// Modules the task-queue runtime imports to register task handlers.
pub const TASK_IMPORTS: &[&str] = &["asynx_core.taskqueue"];

/// Concurrency primitive used by worker processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolBackend {
    Prefork,
    Threads,
    Gevent,
    Eventlet,
    Solo,
}

impl PoolBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolBackend::Prefork => "prefork",
            PoolBackend::Threads => "threads",
            PoolBackend::Gevent => "gevent",
            PoolBackend::Eventlet => "eventlet",
            PoolBackend::Solo => "solo",
        }
    }
}

impl fmt::Display for PoolBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised pool backend identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPoolBackend;

impl fmt::Display for UnknownPoolBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of prefork, threads, gevent, eventlet, solo")
    }
}

impl FromStr for PoolBackend {
    type Err = UnknownPoolBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefork" | "processes" => Ok(PoolBackend::Prefork),
            "threads" => Ok(PoolBackend::Threads),
            "gevent" => Ok(PoolBackend::Gevent),
            "eventlet" => Ok(PoolBackend::Eventlet),
            "solo" => Ok(PoolBackend::Solo),
            _ => Err(UnknownPoolBackend),
        }
    }
}

/// Fully resolved runtime settings.
///
/// Built once by the resolver and read-only afterwards: fields are private
/// and exposed through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub(crate) redis_host: String,
    pub(crate) redis_port: u16,
    pub(crate) redis_db: u32,
    pub(crate) bind_address: String,
    pub(crate) worker_count: u32,
    pub(crate) log_dir: PathBuf,
    pub(crate) celery_log_dir: PathBuf,
    pub(crate) daemon_log_level: String,
    pub(crate) debug_log_level: String,
    pub(crate) celery_daemon_log_level: String,
    pub(crate) celery_debug_log_level: String,
    pub(crate) broker_url: String,
    pub(crate) result_backend_url: String,
    pub(crate) task_result_expiry_seconds: u64,
    pub(crate) timezone: String,
    pub(crate) prefetch_multiplier: u32,
    pub(crate) max_tasks_per_child: u32,
    pub(crate) task_imports: Vec<String>,
    pub(crate) pool_backend: Option<PoolBackend>,
}

impl Settings {
    pub fn redis_host(&self) -> &str {
        &self.redis_host
    }

    pub fn redis_port(&self) -> u16 {
        self.redis_port
    }

    pub fn redis_db(&self) -> u32 {
        self.redis_db
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    pub fn worker_count(&self) -> u32 {
        self.worker_count
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn celery_log_dir(&self) -> &Path {
        &self.celery_log_dir
    }

    pub fn daemon_log_level(&self) -> &str {
        &self.daemon_log_level
    }

    pub fn debug_log_level(&self) -> &str {
        &self.debug_log_level
    }

    pub fn celery_daemon_log_level(&self) -> &str {
        &self.celery_daemon_log_level
    }

    pub fn celery_debug_log_level(&self) -> &str {
        &self.celery_debug_log_level
    }

    pub fn broker_url(&self) -> &str {
        &self.broker_url
    }

    pub fn result_backend_url(&self) -> &str {
        &self.result_backend_url
    }

    pub fn task_result_expiry_seconds(&self) -> u64 {
        self.task_result_expiry_seconds
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn prefetch_multiplier(&self) -> u32 {
        self.prefetch_multiplier
    }

    pub fn max_tasks_per_child(&self) -> u32 {
        self.max_tasks_per_child
    }

    pub fn task_imports(&self) -> &[String] {
        &self.task_imports
    }

    pub fn pool_backend(&self) -> Option<PoolBackend> {
        self.pool_backend
    }

    /// Render the snapshot as `ASYNX_*` variables.
    ///
    /// Feeding the pairs back through the resolver reproduces the same
    /// snapshot, which lets a supervisor pin the resolved values for child
    /// processes.
    pub fn to_env_pairs(&self) -> Vec<(&'static str, String)> {
        use super::env::vars;

        let mut pairs = vec![
            (vars::ASYNX_REDIS_HOST, self.redis_host.clone()),
            (vars::ASYNX_REDIS_PORT, self.redis_port.to_string()),
            (vars::ASYNX_REDIS_DB, self.redis_db.to_string()),
            (vars::ASYNX_BIND, self.bind_address.clone()),
            (vars::ASYNX_WORKERS, self.worker_count.to_string()),
            (vars::ASYNX_LOGDIR, self.log_dir.display().to_string()),
            (
                vars::ASYNX_CELERY_LOGDIR,
                self.celery_log_dir.display().to_string(),
            ),
            (vars::ASYNX_DAEMON_LOGLEVEL, self.daemon_log_level.clone()),
            (vars::ASYNX_DEBUG_LOGLEVEL, self.debug_log_level.clone()),
            (
                vars::ASYNX_CELERY_DAEMON_LOGLEVEL,
                self.celery_daemon_log_level.clone(),
            ),
            (
                vars::ASYNX_CELERY_DEBUG_LOGLEVEL,
                self.celery_debug_log_level.clone(),
            ),
            (vars::ASYNX_CELERY_BROKER_URL, self.broker_url.clone()),
            (
                vars::ASYNX_CELERY_RESULT_BACKEND,
                self.result_backend_url.clone(),
            ),
        ];
        if let Some(pool) = self.pool_backend {
            pairs.push((vars::ASYNX_CELERY_POOL, pool.to_string()));
        }
        pairs
    }
}

/// Optional deployment file contents.
///
/// Every field is optional; absent fields fall through to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub redis: RedisFileConfig,

    #[serde(default)]
    pub server: ServerFileConfig,

    #[serde(default)]
    pub logging: LoggingFileConfig,

    #[serde(default)]
    pub celery: CeleryFileConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedisFileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerFileConfig {
    /// Bind address in `host:port` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    /// Worker count, must be positive. Signed so that a negative value is
    /// reported against `server.workers` at resolve time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingFileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daemon_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub celery_daemon_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub celery_debug_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CeleryFileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_backend: Option<String>,
    /// Pool backend identifier, e.g. `gevent`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
}
