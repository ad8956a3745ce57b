//! Integration tests for deployment file loading.
//!
//! Tests the ConfigLoader's tier handling:
//! - project and user files merged field by field
//! - explicit file replacing the directory tiers
//! - environment variables always winning over file values

use asynx_config::config::{
    ConfigLoader, ConfigPaths, ConfigTier, Environment, PoolBackend, resolve,
};
use asynx_config::error::ConfigError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a ConfigLoader with specific temp directories.
fn create_loader_with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> ConfigLoader {
    let paths = ConfigPaths::with_dirs(project_dir, user_dir);
    ConfigLoader::load_with_paths(paths).expect("Failed to create config loader")
}

/// Write `config.yaml` into a fresh tier directory.
fn write_tier(root: &TempDir, name: &str, content: &str) -> PathBuf {
    let dir = root.path().join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.yaml"), content).unwrap();
    dir
}

fn project_yaml() -> &'static str {
    r#"
redis:
  host: redis.internal
  port: 6380
  db: 2

server:
  bind: 127.0.0.1:18000
  workers: 8

logging:
  dir: /srv/asynx/log
  daemon_level: WARNING

celery:
  pool: gevent
"#
}

#[test]
fn test_project_file_applies() {
    let temp = TempDir::new().unwrap();
    let project = write_tier(&temp, "project", project_yaml());

    let loader = create_loader_with_dirs(Some(project.clone()), Some(temp.path().join("user")));
    assert_eq!(
        loader.sources(),
        &[(ConfigTier::Project, project.join("config.yaml"))]
    );

    let settings = loader.resolve(&Environment::empty()).unwrap();
    assert_eq!(settings.redis_host(), "redis.internal");
    assert_eq!(settings.redis_port(), 6380);
    assert_eq!(settings.broker_url(), "redis://redis.internal:6380/2");
    assert_eq!(settings.bind_address(), "127.0.0.1:18000");
    assert_eq!(settings.worker_count(), 8);
    assert_eq!(settings.celery_log_dir(), PathBuf::from("/srv/asynx/log/celery"));
    assert_eq!(settings.daemon_log_level(), "WARNING");
    assert_eq!(settings.celery_daemon_log_level(), "WARNING");
    assert_eq!(settings.pool_backend(), Some(PoolBackend::Gevent));
}

#[test]
fn test_user_file_overrides_project_fields() {
    let temp = TempDir::new().unwrap();
    let project = write_tier(&temp, "project", project_yaml());
    let user = write_tier(
        &temp,
        "user",
        r#"
server:
  workers: 2
celery:
  pool: null
"#,
    );

    let loader = create_loader_with_dirs(Some(project), Some(user));
    assert_eq!(loader.sources().len(), 2);

    let settings = loader.resolve(&Environment::empty()).unwrap();
    // workers from user
    assert_eq!(settings.worker_count(), 2);
    // bind from project
    assert_eq!(settings.bind_address(), "127.0.0.1:18000");
    // null in the user tier keeps the project value
    assert_eq!(settings.pool_backend(), Some(PoolBackend::Gevent));
}

#[test]
fn test_environment_beats_files() {
    let temp = TempDir::new().unwrap();
    let project = write_tier(&temp, "project", project_yaml());
    let loader = create_loader_with_dirs(Some(project), None);

    let env = Environment::from_pairs([
        ("REDIS_HOSTS", r#"["10.0.0.1:6390"]"#),
        ("ASYNX_WORKERS", "3"),
        ("ASYNX_CELERY_POOL", "prefork"),
    ]);
    let settings = loader.resolve(&env).unwrap();
    assert_eq!(settings.redis_host(), "10.0.0.1");
    assert_eq!(settings.redis_port(), 6390);
    // db is not set in the environment, so the file value stays
    assert_eq!(settings.redis_db(), 2);
    assert_eq!(settings.worker_count(), 3);
    assert_eq!(settings.pool_backend(), Some(PoolBackend::Prefork));
}

#[test]
fn test_bind_env_beats_file() {
    let temp = TempDir::new().unwrap();
    let project = write_tier(&temp, "project", project_yaml());
    let loader = create_loader_with_dirs(Some(project), None);

    let settings = loader.resolve(&Environment::empty()).unwrap();
    assert_eq!(settings.bind_address(), "127.0.0.1:18000");

    let env = Environment::from_pairs([("ASYNX_BIND", "127.0.0.1:9000")]);
    let settings = loader.resolve(&env).unwrap();
    assert_eq!(settings.bind_address(), "127.0.0.1:9000");
}

#[test]
fn test_blank_file_strings_use_defaults() {
    let temp = TempDir::new().unwrap();
    let project = write_tier(
        &temp,
        "project",
        "redis:\n  host: \"\"\nserver:\n  bind: \"\"\ncelery:\n  broker_url: \"\"\n",
    );
    let loader = create_loader_with_dirs(Some(project), None);

    let settings = loader.resolve(&Environment::empty()).unwrap();
    assert_eq!(settings.redis_host(), "localhost");
    assert_eq!(settings.bind_address(), "0.0.0.0:17969");
    assert_eq!(settings.broker_url(), "redis://localhost:6379/0");

    // Pinned pairs must reproduce the snapshot without the files.
    let pinned = Environment::from_pairs(settings.to_env_pairs());
    assert_eq!(resolve(&pinned).unwrap(), settings);
}

#[test]
fn test_explicit_file_replaces_tiers() {
    let temp = TempDir::new().unwrap();
    write_tier(&temp, "project", project_yaml());
    let explicit = temp.path().join("deploy.yaml");
    fs::write(&explicit, "server:\n  workers: 32\n").unwrap();

    let env = Environment::from_pairs([
        ("ASYNX_CONFIG_PATH", explicit.to_str().unwrap()),
        ("ASYNX_PROJECT_DIR", temp.path().join("project").to_str().unwrap()),
    ]);
    let loader = ConfigLoader::load(&env).unwrap();
    assert_eq!(loader.sources(), &[(ConfigTier::Explicit, explicit)]);

    let settings = loader.resolve(&env).unwrap();
    assert_eq!(settings.worker_count(), 32);
    assert_eq!(settings.redis_host(), "localhost");
}

#[test]
fn test_malformed_yaml_is_error() {
    let temp = TempDir::new().unwrap();
    let project = write_tier(&temp, "project", "redis: [unclosed\n");

    let err = ConfigLoader::load_with_paths(ConfigPaths::with_dirs(Some(project), None))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Yaml { .. }));
}

#[test]
fn test_unknown_key_is_error() {
    let temp = TempDir::new().unwrap();
    let project = write_tier(&temp, "project", "redis:\n  hosts: [a, b]\n");

    let err = ConfigLoader::load_with_paths(ConfigPaths::with_dirs(Some(project), None))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Shape(_)));
}

#[test]
fn test_invalid_file_pool_fails_resolution() {
    let temp = TempDir::new().unwrap();
    let project = write_tier(&temp, "project", "celery:\n  pool: coroutines\n");
    let loader = create_loader_with_dirs(Some(project), None);

    let err = loader.resolve(&Environment::empty()).unwrap_err();
    match err {
        ConfigError::Parse(parse) => {
            assert_eq!(parse.variable, "celery.pool");
            assert_eq!(parse.value, "coroutines");
        }
        other => panic!("unexpected error: {other}"),
    }
}
