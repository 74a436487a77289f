//! Configuration management for qtdl

pub mod schema;

pub use schema::Config;

use crate::error::{QtdlError, QtdlResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("qtdl")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults if the file is absent
    pub fn load(&self) -> QtdlResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(&self, path: &Path) -> QtdlResult<Config> {
        let content = fs::read_to_string(path)
            .map_err(|e| QtdlError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| QtdlError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub fn save(&self, config: &Config) -> QtdlResult<()> {
        self.ensure_config_dir()?;

        let content = toml::to_string_pretty(config).map_err(|e| QtdlError::ConfigInvalid {
            path: self.config_path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&self.config_path, content).map_err(|e| {
            QtdlError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    fn ensure_config_dir(&self) -> QtdlResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| QtdlError::ConfigDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.toml"));
        let config = manager.load().unwrap();
        assert_eq!(config.install.unpacker, "7z");
    }

    #[test]
    fn save_and_reload() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("config.toml"));
        let mut config = Config::default();
        config.remote.timeout_secs = 5;
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.remote.timeout_secs, 5);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "remote = \"nope\"").unwrap();
        let manager = ConfigManager::with_path(path);
        assert!(matches!(
            manager.load(),
            Err(QtdlError::ConfigInvalid { .. })
        ));
    }
}
