//! # ctlrelay-config
//!
//! Configuration for ctlrelay.
//!
//! Loads configuration from:
//! 1. Built-in defaults
//! 2. `~/.ctlrelay/config.toml` (global)
//! 3. Environment variables (highest priority)

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub mod logging;

/// Well-known control file commands are written to
pub const DEFAULT_CONTROL_PATH: &str = "/proc/rtkit";

/// Overrides `control.path`
pub const CONTROL_PATH_ENV: &str = "CTLRELAY_CONTROL_PATH";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub control: ControlConfig,
}

impl Config {
    /// Load config from standard locations
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config = Self::from_file(&global_path)?;
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse a single TOML file; missing sections keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        crate::log_config_debug!(
            "Loading config",
            path = tracing::field::display(path.display())
        );
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Global config path: ~/.ctlrelay/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".ctlrelay/config.toml"))
    }

    fn apply_env_overrides(&mut self) {
        self.apply_control_path_override(std::env::var_os(CONTROL_PATH_ENV));
    }

    fn apply_control_path_override(&mut self, value: Option<OsString>) {
        match value {
            Some(path) if !path.is_empty() => {
                crate::log_config_debug!(
                    "Control path overridden from environment",
                    path = tracing::field::debug(&path)
                );
                self.control.path = PathBuf::from(path);
            }
            _ => {}
        }
    }
}

/// Control interface configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// File that receives the command token
    pub path: PathBuf,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONTROL_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.control.path, PathBuf::from("/proc/rtkit"));
    }

    #[test]
    fn test_default_serializes_control_section() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml_str.contains("[control]"));
        assert!(toml_str.contains("/proc/rtkit"));
    }

    #[test]
    fn test_empty_toml_keeps_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_override_replaces_path() {
        let mut config = Config::default();
        config.apply_control_path_override(Some(OsString::from("/tmp/ctl")));
        assert_eq!(config.control.path, PathBuf::from("/tmp/ctl"));
    }

    #[test]
    fn test_empty_env_override_is_ignored() {
        let mut config = Config::default();
        config.apply_control_path_override(Some(OsString::new()));
        assert_eq!(config.control.path, PathBuf::from(DEFAULT_CONTROL_PATH));

        config.apply_control_path_override(None);
        assert_eq!(config.control.path, PathBuf::from(DEFAULT_CONTROL_PATH));
    }
}
