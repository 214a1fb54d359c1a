//! Configuration management for Folio.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so an absent file or a
//! partial file both work.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `server.port`.
pub const PORT_ENV: &str = "PORT";

/// Root configuration structure for Folio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Pretrained model settings
    pub model: ModelConfig,

    /// Tag selection settings
    pub tagging: TaggingConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.folio.folio/config.toml
    /// - Linux: ~/.config/folio/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\folio\config\config.toml
    ///
    /// Falls back to ~/.folio/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "folio", "folio")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".folio").join("config.toml")
            })
    }

    /// Apply the `PORT` environment variable, if set, over `server.port`.
    ///
    /// An unparseable value is ignored with a warning and the configured
    /// port is kept.
    pub fn apply_env(&mut self) {
        if let Ok(raw) = std::env::var(PORT_ENV) {
            self.apply_port_override(&raw);
        }
    }

    fn apply_port_override(&mut self, raw: &str) {
        match raw.trim().parse::<u16>() {
            Ok(port) if port > 0 => self.server.port = port,
            _ => tracing::warn!("Ignoring invalid {PORT_ENV} value {raw:?}"),
        }
    }

    /// Get the resolved model directory path (with ~ expansion).
    pub fn model_dir(&self) -> PathBuf {
        let path_str = self.model.model_dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Directory holding the files for the configured model variant.
    pub fn model_variant_dir(&self) -> PathBuf {
        self.model_dir().join(&self.model.name)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
