//! Application configuration
//!
//! Stored as JSON under the user config directory; a default file is written
//! on first run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{config, storage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Storage file; defaults to the user data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
    /// Used when `LOG_LEVEL` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Bumping this discards drafts written under another version
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_schema_version() -> u32 {
    storage::SCHEMA_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: None,
            log_level: default_log_level(),
            schema_version: default_schema_version(),
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::APP_DIR);
        path.push(config::FILENAME);
        path
    }

    /// Load from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, creating default config at {:?}", config_path);
            let config = Config::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {:?}", config_path))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config JSON from {:?}", config_path))?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        fs::write(config_path, json)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;
        info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Storage file to use, `override_path` first
    pub fn storage_path(&self, override_path: Option<&Path>) -> PathBuf {
        if let Some(path) = override_path.or(self.storage_path.as_deref()) {
            return path.to_path_buf();
        }
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::APP_DIR);
        path.push(config::STORAGE_FILENAME);
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_is_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo-effects/config.json");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "log_level": "debug" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.schema_version, storage::SCHEMA_VERSION);
        assert_eq!(config.storage_path, None);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config JSON"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{");
    }

    #[test]
    fn test_storage_path_precedence() {
        let config = Config {
            storage_path: Some(PathBuf::from("/from/config.json")),
            ..Config::default()
        };
        assert_eq!(config.storage_path(Some(Path::new("/from/flag.json"))), PathBuf::from("/from/flag.json"));
        assert_eq!(config.storage_path(None), PathBuf::from("/from/config.json"));
        assert!(Config::default().storage_path(None).ends_with("demo-effects/storage.json"));
    }
}
