//! Configuration management
//!
//! Settings are layered, later layers overriding earlier ones:
//! built-in defaults, the global config file, the project-local file
//! `.uniform-request.yaml`, environment variables, then CLI flags.

use directories::ProjectDirs;
use miette::Diagnostic;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::validate::QuantityPolicy;

/// Name of the project-local config file
pub const LOCAL_CONFIG_FILE: &str = ".uniform-request.yaml";

/// Environment variable overriding the master data directory
pub const ENV_MASTER_DIR: &str = "UNIFORM_REQUEST_MASTER_DIR";

/// Environment variable overriding the export directory
pub const ENV_EXPORT_DIR: &str = "UNIFORM_REQUEST_EXPORT_DIR";

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the five master CSV files
    pub master_dir: PathBuf,
    /// Directory receiving exported CSV files
    pub export_dir: PathBuf,
    /// Quantity validation rules
    pub quantity: QuantityPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            master_dir: PathBuf::from("files"),
            export_dir: PathBuf::from("."),
            quantity: QuantityPolicy::default(),
        }
    }
}

/// One config file layer; absent keys leave the lower layer untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    master_dir: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    quantity: Option<QuantityLayer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuantityLayer {
    allow_zero: Option<bool>,
}

/// Errors raised while reading configuration files
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    #[diagnostic(code(uniform_request::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {message}", path.display())]
    #[diagnostic(
        code(uniform_request::config::parse),
        help("Supported keys: master_dir, export_dir, quantity.allow_zero")
    )]
    Parse { path: PathBuf, message: String },
}

impl Config {
    /// Load configuration from the global file, the local file in `cwd`
    /// and the environment
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = Self::global_config_path() {
            config.merge_file(&path)?;
        }
        config.merge_file(&cwd.join(LOCAL_CONFIG_FILE))?;
        config.merge_env(|key| std::env::var(key).ok());

        debug!(?config, "Configuration resolved");
        Ok(config)
    }

    /// Path of the global config file, if a config directory exists
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "uniform-request").map(|d| d.config_dir().join("config.yaml"))
    }

    /// Merge a YAML config file if it exists
    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        if !path.is_file() {
            return Ok(());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_yaml(&content, path)
    }

    fn merge_yaml(&mut self, content: &str, path: &Path) -> Result<(), ConfigError> {
        // an empty file is a valid, empty layer
        if content.trim().is_empty() {
            return Ok(());
        }

        let layer: ConfigLayer =
            serde_yml::from_str(content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        debug!("Merging config file {}", path.display());
        self.apply(layer);
        Ok(())
    }

    fn apply(&mut self, layer: ConfigLayer) {
        if let Some(dir) = layer.master_dir {
            self.master_dir = dir;
        }
        if let Some(dir) = layer.export_dir {
            self.export_dir = dir;
        }
        if let Some(allow_zero) = layer.quantity.and_then(|q| q.allow_zero) {
            self.quantity.allow_zero = allow_zero;
        }
    }

    /// Merge environment overrides using the given lookup
    pub fn merge_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_MASTER_DIR).filter(|v| !v.is_empty()) {
            self.master_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_EXPORT_DIR).filter(|v| !v.is_empty()) {
            self.export_dir = PathBuf::from(dir);
        }
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, master_dir: Option<PathBuf>, export_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = master_dir {
            self.master_dir = dir;
        }
        if let Some(dir) = export_dir {
            self.export_dir = dir;
        }
        self
    }
}
