//! Configuration file support for liftlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.
//! A few environment variables override the file:
//! `LIFTLOG_DATA_DIR`, `LIFTLOG_OWNER_ID` and `LIFTLOG_BIND`.

use crate::history::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub owner: OwnerConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Whose workouts this instance records
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OwnerConfig {
    #[serde(default = "default_owner_id")]
    pub id: String,
}

impl Default for OwnerConfig {
    fn default() -> Self {
        Self {
            id: default_owner_id(),
        }
    }
}

/// History query limits
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_limit")]
    pub default_limit: usize,

    #[serde(default = "default_max_history_limit")]
    pub max_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_history_limit(),
            max_limit: default_max_history_limit(),
        }
    }
}

/// HTTP server settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("liftlog")
}

fn default_owner_id() -> String {
    "default".into()
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_max_history_limit() -> usize {
    MAX_HISTORY_LIMIT
}

fn default_bind() -> String {
    "127.0.0.1:8080".into()
}

impl Config {
    /// Load configuration from the standard config path, then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply `LIFTLOG_*` overrides from the given lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("LIFTLOG_DATA_DIR").filter(|v| !v.is_empty()) {
            self.data.data_dir = PathBuf::from(dir);
        }
        if let Some(owner) = lookup("LIFTLOG_OWNER_ID").filter(|v| !v.trim().is_empty()) {
            self.owner.id = owner.trim().to_string();
        }
        if let Some(bind) = lookup("LIFTLOG_BIND").filter(|v| !v.is_empty()) {
            self.server.bind = bind;
        }
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.owner.id.trim().is_empty() {
            return Err(Error::Config("owner.id must not be empty".into()));
        }
        if self.history.max_limit == 0 {
            return Err(Error::Config("history.max_limit must be at least 1".into()));
        }
        if self.history.default_limit == 0 || self.history.default_limit > self.history.max_limit
        {
            return Err(Error::Config(format!(
                "history.default_limit must be between 1 and {}",
                self.history.max_limit
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("liftlog")
            .join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
