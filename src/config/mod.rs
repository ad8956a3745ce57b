//! Runtime settings for the asynx task queue.
//!
//! Settings are resolved once at startup from three layers:
//! 1. **Defaults** - the `DEFAULT_*` constants
//! 2. **Deployment files** - `$CWD/asynx/config.yaml` and `~/.asynx/config.yaml`,
//!    merged field by field (or a single `ASYNX_CONFIG_PATH` file)
//! 3. **Environment** - always wins
//!
//! Resolution takes an injected [`Environment`]; nothing in this module reads
//! process state except [`Environment::from_process`].
//!
//! ## Environment Variables
//! - `REDIS_HOST`, `REDIS_PORT` - Base Redis endpoint
//! - `REDIS_HOSTS` - Legacy JSON array of `host:port`, first entry used
//! - `ASYNX_REDIS_HOST`, `ASYNX_REDIS_PORT`, `ASYNX_REDIS_DB` - Redis overrides
//! - `ASYNX_BIND` - Bind address (default: `0.0.0.0:17969`)
//! - `ASYNX_WORKERS` - Worker count (default: 4)
//! - `ASYNX_LOGDIR` - Log directory (default: `/tmp/asynx-log`)
//! - `ASYNX_DAEMON_LOGLEVEL`, `ASYNX_DEBUG_LOGLEVEL` - Log levels
//! - `ASYNX_CELERY_BROKER_URL`, `ASYNX_CELERY_RESULT_BACKEND` - Task-queue URLs
//! - `ASYNX_CELERY_DAEMON_LOGLEVEL`, `ASYNX_CELERY_DEBUG_LOGLEVEL` - Task-queue log levels
//! - `ASYNX_CELERY_LOGDIR` - Task-queue log directory (default: `$ASYNX_LOGDIR/celery`)
//! - `ASYNX_CELERY_POOL` - Worker pool backend
//! - `ASYNX_CONFIG_PATH`, `ASYNX_PROJECT_DIR`, `ASYNX_USER_DIR` - Deployment file discovery

mod env;
mod legacy;
mod loader;
mod merge;
mod resolver;
mod types;

pub use env::{Environment, vars};
pub use legacy::parse_redis_hosts;
pub use loader::{CONFIG_FILE_NAME, ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::{merge_into, merge_tiers};
pub use resolver::{ConfigResolver, resolve};
pub use types::*;
