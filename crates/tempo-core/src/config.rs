use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::controller::TimerConfig;
use crate::session::LeisureRatio;

pub use tempo_storage::get_data_dir;

/// Application settings read from `config.toml` in the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Profile used when a command does not name one
    pub default_profile: Option<String>,
    /// Resume saved counters when a session starts
    pub restore_snapshot: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_profile: None,
            restore_snapshot: true,
        }
    }
}

impl AppConfig {
    pub const FILE_NAME: &'static str = "config.toml";

    /// Load from a file; a missing file yields the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Load `config.toml` from the data directory
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory is unknown or the file is invalid
    pub fn load_default() -> Result<Self> {
        Self::load(&get_data_dir()?.join(Self::FILE_NAME))
    }

    /// Like [`AppConfig::load_default`], but falls back to the defaults with
    /// a warning instead of failing
    #[must_use]
    pub fn load_or_default() -> Self {
        Self::or_default(Self::load_default())
    }

    fn or_default(loaded: Result<Self>) -> Self {
        loaded.unwrap_or_else(|e| {
            log::warn!("Using default settings: {e:#}");
            Self::default()
        })
    }

    /// Timer settings for a profile with the given leisure ratio
    #[must_use]
    pub fn timer_config(&self, leisure_ratio_percent: u8) -> TimerConfig {
        TimerConfig {
            auto_tick: true,
            leisure_ratio: LeisureRatio::from_percent(leisure_ratio_percent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_profile = \"ana\"\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("ana"));
        assert!(config.restore_snapshot);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "restore_snapshot = \"sometimes\"\n").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_tick_interval_is_not_configurable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tick_interval_ms = 250\n").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("tick_interval_ms"));
    }

    #[test]
    fn test_unreadable_config_falls_back_to_defaults() {
        let loaded = Err(anyhow::anyhow!("Failed to get local data dir"));
        assert_eq!(AppConfig::or_default(loaded), AppConfig::default());

        let custom = AppConfig {
            default_profile: Some("ana".to_string()),
            restore_snapshot: false,
        };
        assert_eq!(AppConfig::or_default(Ok(custom.clone())), custom);
    }

    #[test]
    fn test_timer_config() {
        let timer = AppConfig::default().timer_config(30);
        assert!(timer.auto_tick);
        assert_eq!(timer.leisure_ratio.percent(), 30);
    }
}
