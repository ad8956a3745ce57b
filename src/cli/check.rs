//! `check` command: validate the configuration before deploying it.

use crate::config::{ConfigLoader, Environment, Settings};
use crate::logging::level_from_name;
use anyhow::{Context, Result};
use tracing::warn;

/// Run the check command.
pub fn run_check(loader: &ConfigLoader, env: &Environment) -> Result<()> {
    let settings = loader
        .resolve(env)
        .context("configuration check failed")?;

    for (tier, path) in loader.sources() {
        println!("Using {} file: {}", tier, path.display());
    }

    let unknown = unknown_log_levels(&settings);
    for (field, value) in &unknown {
        warn!(field = %field, value = %value, "Log level is not recognised by the task queue");
        println!("Warning: {} = {:?} is not a known log level", field, value);
    }

    println!(
        "OK: broker {} with {} worker(s), binding {}",
        settings.broker_url(),
        settings.worker_count(),
        settings.bind_address()
    );
    Ok(())
}

/// Log level fields whose value the task-queue runtime would reject.
pub fn unknown_log_levels(settings: &Settings) -> Vec<(&'static str, String)> {
    [
        ("daemon_log_level", settings.daemon_log_level()),
        ("debug_log_level", settings.debug_log_level()),
        ("celery_daemon_log_level", settings.celery_daemon_log_level()),
        ("celery_debug_log_level", settings.celery_debug_log_level()),
    ]
    .into_iter()
    .filter(|(_, value)| level_from_name(value).is_none())
    .map(|(field, value)| (field, value.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve;

    #[test]
    fn test_defaults_have_known_levels() {
        let settings = resolve(&Environment::empty()).unwrap();
        assert!(unknown_log_levels(&settings).is_empty());
    }

    #[test]
    fn test_unknown_level_inherited_by_celery() {
        let env = Environment::empty().with("ASYNX_DAEMON_LOGLEVEL", "LOUD");
        let settings = resolve(&env).unwrap();
        let unknown = unknown_log_levels(&settings);
        assert_eq!(
            unknown,
            vec![
                ("daemon_log_level", "LOUD".to_string()),
                ("celery_daemon_log_level", "LOUD".to_string()),
            ]
        );
    }
}
