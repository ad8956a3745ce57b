//! Deployment file loader with tier-based merging.
//!
//! Reads the optional YAML deployment files, merges them field-by-field and
//! produces a [`ConfigResolver`] that places their values beneath the
//! environment.

use super::env::{Environment, vars};
use super::merge::merge_tiers;
use super::resolver::ConfigResolver;
use super::types::{FileConfig, Settings};
use crate::error::{ConfigError, ConfigResult};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name looked up inside each tier directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Deployment file tier priority (lowest to highest).
///
/// Built-in defaults sit below every tier and the environment above them;
/// neither is read from a file, so neither appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Project-level file ($CWD/asynx/config.yaml)
    Project = 0,
    /// User-level file (~/.asynx/config.yaml)
    User = 1,
    /// File named by ASYNX_CONFIG_PATH, replaces project and user tiers
    Explicit = 2,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Explicit => write!(f, "explicit"),
        }
    }
}

/// Locations of the deployment file tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Explicit file; when set, directory tiers are not consulted
    pub explicit_file: Option<PathBuf>,
    /// Project-level config directory
    pub project_dir: Option<PathBuf>,
    /// User-level config directory
    pub user_dir: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover tier locations from the given environment.
    pub fn discover(env: &Environment) -> Self {
        // Project dir: ASYNX_PROJECT_DIR or $CWD/asynx
        let project_dir = env
            .get(vars::ASYNX_PROJECT_DIR)
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("asynx")));

        // User dir: ASYNX_USER_DIR or ~/.asynx
        let user_dir = env
            .get(vars::ASYNX_USER_DIR)
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".asynx")));

        Self {
            explicit_file: env.get(vars::ASYNX_CONFIG_PATH).map(PathBuf::from),
            project_dir,
            user_dir,
        }
    }

    /// Paths with explicit tier directories.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            explicit_file: None,
            project_dir,
            user_dir,
        }
    }

    /// Paths consisting of a single explicit file.
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self {
            explicit_file: Some(path.into()),
            project_dir: None,
            user_dir: None,
        }
    }

    /// Candidate files in order of increasing precedence.
    fn candidates(&self) -> Vec<(ConfigTier, PathBuf)> {
        if let Some(ref file) = self.explicit_file {
            return vec![(ConfigTier::Explicit, file.clone())];
        }

        let mut out = Vec::new();
        if let Some(ref dir) = self.project_dir {
            out.push((ConfigTier::Project, dir.join(CONFIG_FILE_NAME)));
        }
        if let Some(ref dir) = self.user_dir {
            out.push((ConfigTier::User, dir.join(CONFIG_FILE_NAME)));
        }
        out
    }
}

/// Loaded deployment files.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    files: FileConfig,
    /// Files that contributed, lowest tier first
    sources: Vec<(ConfigTier, PathBuf)>,
}

impl ConfigLoader {
    /// Load deployment files discovered from the environment.
    pub fn load(env: &Environment) -> ConfigResult<Self> {
        Self::load_with_paths(ConfigPaths::discover(env))
    }

    /// A loader with no deployment files.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load deployment files from explicit paths.
    ///
    /// Missing tier files are skipped, but a missing explicit file is an error.
    pub fn load_with_paths(paths: ConfigPaths) -> ConfigResult<Self> {
        let mut tiers: Vec<Value> = Vec::new();
        let mut sources = Vec::new();

        for (tier, path) in paths.candidates() {
            if tier != ConfigTier::Explicit && !path.is_file() {
                debug!(tier = %tier, path = %path.display(), "No deployment file");
                continue;
            }
            tiers.push(read_yaml(&path)?);
            debug!(tier = %tier, path = %path.display(), "Loaded deployment file");
            sources.push((tier, path));
        }

        let merged = merge_tiers(tiers);
        let files: FileConfig = if merged.is_null() {
            FileConfig::default()
        } else {
            serde_json::from_value(merged)?
        };

        if !sources.is_empty() {
            info!(count = sources.len(), "Deployment configuration loaded");
        }

        Ok(Self { files, sources })
    }

    /// Merged deployment file values.
    pub fn files(&self) -> &FileConfig {
        &self.files
    }

    /// Files that contributed values, lowest tier first.
    pub fn sources(&self) -> &[(ConfigTier, PathBuf)] {
        &self.sources
    }

    /// A resolver layering the environment over these files.
    pub fn resolver(&self) -> ConfigResolver {
        ConfigResolver::new().with_files(self.files.clone())
    }

    /// Resolve settings from these files and the given environment.
    pub fn resolve(&self, env: &Environment) -> ConfigResult<Settings> {
        Ok(self.resolver().resolve(env)?)
    }
}

fn read_yaml(path: &Path) -> ConfigResult<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str::<Value>(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}
