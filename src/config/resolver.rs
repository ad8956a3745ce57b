//! Layered settings resolution.
//!
//! Precedence, lowest to highest:
//! 1. Built-in defaults
//! 2. Deployment files (see [`ConfigLoader`](super::ConfigLoader))
//! 3. `REDIS_HOST` / `REDIS_PORT`, then `REDIS_HOSTS` (legacy), then
//!    `ASYNX_*` variables
//!
//! Derived values (broker URL, result backend, task-queue log directory and
//! levels) are computed after every input is resolved.

use super::env::{Environment, vars};
use super::legacy::parse_redis_hosts;
use super::types::*;
use crate::error::ConfigParseError;
use std::path::PathBuf;
use tracing::debug;

/// Resolves an [`Environment`] into [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    files: FileConfig,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use deployment file values beneath the environment.
    pub fn with_files(mut self, files: FileConfig) -> Self {
        self.files = files;
        self
    }

    pub fn files(&self) -> &FileConfig {
        &self.files
    }

    /// Resolve settings. Any unparsable value aborts resolution.
    pub fn resolve(&self, env: &Environment) -> Result<Settings, ConfigParseError> {
        let files = &self.files;

        // Redis endpoint
        let mut redis_host = file_str(&files.redis.host)
            .unwrap_or(DEFAULT_REDIS_HOST)
            .to_string();
        let mut redis_port = files.redis.port.unwrap_or(DEFAULT_REDIS_PORT);

        if let Some(host) = env.get(vars::REDIS_HOST) {
            redis_host = host.to_string();
        }
        if let Some(port) = env.parse::<u16>(vars::REDIS_PORT)? {
            redis_port = port;
        }

        if let Some(raw) = env.get(vars::REDIS_HOSTS) {
            let (host, port) = parse_redis_hosts(vars::REDIS_HOSTS, raw)?;
            debug!(host = %host, port, "Using first entry of legacy REDIS_HOSTS");
            redis_host = host;
            redis_port = port;
        }

        if let Some(host) = env.get(vars::ASYNX_REDIS_HOST) {
            redis_host = host.to_string();
        }
        if let Some(port) = env.parse::<u16>(vars::ASYNX_REDIS_PORT)? {
            redis_port = port;
        }

        let redis_db = env
            .parse::<u32>(vars::ASYNX_REDIS_DB)?
            .or(files.redis.db)
            .unwrap_or(DEFAULT_REDIS_DB);

        // Server
        let bind_address = env
            .get(vars::ASYNX_BIND)
            .or(file_str(&files.server.bind))
            .unwrap_or(DEFAULT_BIND)
            .to_string();

        let worker_count = resolve_worker_count(env, files)?;

        // Logging
        let log_dir = env
            .get(vars::ASYNX_LOGDIR)
            .map(PathBuf::from)
            .or_else(|| {
                files
                    .logging
                    .dir
                    .clone()
                    .filter(|dir| !dir.as_os_str().is_empty())
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        let daemon_log_level = string_setting(
            env,
            vars::ASYNX_DAEMON_LOGLEVEL,
            &files.logging.daemon_level,
            DEFAULT_DAEMON_LOGLEVEL,
        );
        let debug_log_level = string_setting(
            env,
            vars::ASYNX_DEBUG_LOGLEVEL,
            &files.logging.debug_level,
            DEFAULT_DEBUG_LOGLEVEL,
        );

        // Derived task-queue values
        let broker_url = env
            .get(vars::ASYNX_CELERY_BROKER_URL)
            .or(file_str(&files.celery.broker_url))
            .map(str::to_string)
            .unwrap_or_else(|| format!("redis://{}:{}/{}", redis_host, redis_port, redis_db));

        let result_backend_url = env
            .get(vars::ASYNX_CELERY_RESULT_BACKEND)
            .or(file_str(&files.celery.result_backend))
            .map(str::to_string)
            .unwrap_or_else(|| broker_url.clone());

        let celery_log_dir = env
            .get(vars::ASYNX_CELERY_LOGDIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| log_dir.join(CELERY_LOG_SUBDIR));

        let celery_daemon_log_level = string_setting(
            env,
            vars::ASYNX_CELERY_DAEMON_LOGLEVEL,
            &files.logging.celery_daemon_level,
            &daemon_log_level,
        );
        let celery_debug_log_level = string_setting(
            env,
            vars::ASYNX_CELERY_DEBUG_LOGLEVEL,
            &files.logging.celery_debug_level,
            &debug_log_level,
        );

        let pool_backend = resolve_pool_backend(env, files)?;

        debug!(
            redis_host = %redis_host,
            redis_port,
            redis_db,
            bind = %bind_address,
            workers = worker_count,
            pool = ?pool_backend,
            "Settings resolved"
        );

        Ok(Settings {
            redis_host,
            redis_port,
            redis_db,
            bind_address,
            worker_count,
            log_dir,
            celery_log_dir,
            daemon_log_level,
            debug_log_level,
            celery_daemon_log_level,
            celery_debug_log_level,
            broker_url,
            result_backend_url,
            task_result_expiry_seconds: TASK_RESULT_EXPIRES,
            timezone: TIMEZONE.to_string(),
            prefetch_multiplier: PREFETCH_MULTIPLIER,
            max_tasks_per_child: MAX_TASKS_PER_CHILD,
            task_imports: TASK_IMPORTS.iter().map(|s| s.to_string()).collect(),
            pool_backend,
        })
    }
}

/// Resolve settings from the environment alone.
pub fn resolve(env: &Environment) -> Result<Settings, ConfigParseError> {
    ConfigResolver::default().resolve(env)
}

/// A deployment file string, with blank values treated as unset.
fn file_str(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn string_setting(
    env: &Environment,
    var: &str,
    file_value: &Option<String>,
    default: &str,
) -> String {
    env.get(var)
        .or(file_str(file_value))
        .unwrap_or(default)
        .to_string()
}

fn resolve_worker_count(env: &Environment, files: &FileConfig) -> Result<u32, ConfigParseError> {
    if let Some(raw) = env.get(vars::ASYNX_WORKERS) {
        let count = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigParseError::not_an_integer(vars::ASYNX_WORKERS, raw))?;
        return u32::try_from(count)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigParseError::not_positive(vars::ASYNX_WORKERS, raw));
    }

    match files.server.workers {
        Some(count) => u32::try_from(count)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigParseError::not_positive("server.workers", &count.to_string())),
        None => Ok(DEFAULT_WORKERS),
    }
}

fn resolve_pool_backend(
    env: &Environment,
    files: &FileConfig,
) -> Result<Option<PoolBackend>, ConfigParseError> {
    let (source, raw) = match env.get(vars::ASYNX_CELERY_POOL) {
        Some(raw) => (vars::ASYNX_CELERY_POOL, raw),
        None => match file_str(&files.celery.pool) {
            Some(raw) => ("celery.pool", raw),
            None => return Ok(None),
        },
    };

    raw.parse::<PoolBackend>()
        .map(Some)
        .map_err(|e| ConfigParseError::new(source, raw, e.to_string()))
}
