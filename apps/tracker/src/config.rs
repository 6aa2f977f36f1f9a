//! Tracker configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;
use task_store::StoreConfig;

/// Tracker configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackerConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Storage settings
    #[serde(flatten)]
    pub store: StoreConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            store: StoreConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from an optional config file and the environment.
    ///
    /// Environment variables take precedence over the file, which takes
    /// precedence over defaults. An explicit `path` must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::find_config_file() {
                Some(found) => Self::from_file(&found)?,
                None => Self::default(),
            },
        };

        config.store.apply_env();
        if let Ok(level) = std::env::var("TRACKER_LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut locations = vec![PathBuf::from("tracker.toml")];
        if let Some(dir) = dirs::config_dir() {
            locations.push(dir.join("tracker").join("config.toml"));
        }

        locations.into_iter().find(|p| p.exists())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
