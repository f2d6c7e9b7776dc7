//! Configuration loading and resolution
//!
//! Every service setting is resolved in the same priority order:
//! 1. Command-line argument or environment variable (clap merges both)
//! 2. TOML config file
//! 3. Compiled default (fallback)
//!
//! A missing TOML file never prevents startup: a warning is logged and the
//! compiled defaults apply. A TOML file that exists but does not parse is a
//! configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "EXO_CONFIG";

/// Compiled default listen address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Compiled default listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Compiled default directory holding `modelo_<variant>_exoplanetas.json` artifacts
pub const DEFAULT_MODELS_DIR: &str = "models";

/// Compiled default directory holding pre-cleaned dataset CSV tables
pub const DEFAULT_DATASETS_DIR: &str = "data";

/// Compiled default tracing filter level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging section of the TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Tracing filter level ("trace", "debug", "info", "warn", "error")
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// On-disk TOML configuration. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub models_dir: Option<PathBuf>,
    pub datasets_dir: Option<PathBuf>,
    /// Seed for every randomized mock path (unset = entropy)
    pub mock_seed: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub models_dir: Option<PathBuf>,
    pub datasets_dir: Option<PathBuf>,
    pub mock_seed: Option<u64>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub models_dir: PathBuf,
    pub datasets_dir: PathBuf,
    pub mock_seed: Option<u64>,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            datasets_dir: PathBuf::from(DEFAULT_DATASETS_DIR),
            mock_seed: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Merge CLI/ENV overrides over the TOML file over compiled defaults
    pub fn from_layers(overrides: ConfigOverrides, toml: TomlConfig) -> Self {
        let defaults = Self::default();

        Self {
            host: overrides.host.or(toml.host).unwrap_or(defaults.host),
            port: overrides.port.or(toml.port).unwrap_or(defaults.port),
            models_dir: overrides
                .models_dir
                .or(toml.models_dir)
                .unwrap_or(defaults.models_dir),
            datasets_dir: overrides
                .datasets_dir
                .or(toml.datasets_dir)
                .unwrap_or(defaults.datasets_dir),
            mock_seed: overrides.mock_seed.or(toml.mock_seed),
            log_level: overrides.log_level.unwrap_or(toml.logging.level),
        }
    }

    /// "host:port" string suitable for binding a listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Locates the TOML file for a module
///
/// Priority: explicit path → `EXO_CONFIG` → `<config_dir>/exo/<module>.toml`
pub struct ConfigResolver {
    module_name: String,
}

impl ConfigResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
        }
    }

    /// Resolve the config file path, if any candidate can be named
    pub fn resolve(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        self.default_path()
    }

    /// Platform config directory candidate
    pub fn default_path(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("exo").join(format!("{}.toml", self.module_name)))
    }
}

/// Load a TOML config file
///
/// Missing file → warning + defaults. Unreadable or unparseable → error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {} (using compiled defaults)",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed for {}: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}
