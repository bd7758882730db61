//! Configuration management for Exposure.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. The remote service base URL is the
//! one required field: validation fails before any network call is
//! attempted when it is unset.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/exposure/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used —
/// but `validate()` still rejects a missing base URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote scanning service settings
    pub service: ServiceConfig,
    /// Ambient environment attributes used for fingerprinting
    pub environment: EnvironmentConfig,
}

impl AppConfig {
    /// Load configuration from the default path, falling back to
    /// defaults if the file is not present.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, falling back to
    /// defaults if the file is not present.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides to an already-loaded config.
    ///
    /// Supports the following environment variables:
    /// - `EXPOSURE_BASE_URL`: Override the service base URL
    /// - `EXPOSURE_TIMEOUT_SECS`: Override the request timeout
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("EXPOSURE_BASE_URL") {
            if !val.is_empty() {
                tracing::debug!("Override service.base_url from env");
                self.service.base_url = val;
            }
        }

        if let Ok(val) = std::env::var("EXPOSURE_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                tracing::debug!("Override service.timeout_secs from env: {}", secs);
                self.service.timeout_secs = secs;
            }
        }
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/exposure/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("dev", "cyber-exposure", "exposure").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Validate the configuration before any network use.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if the base URL is unset or
    /// not an HTTP(S) URL, or if the timeout is zero.
    pub fn validate(&self) -> ConfigResult<()> {
        self.service.validate()
    }
}

/// Remote scanning service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the scanning service (required, no default endpoint)
    pub base_url: String,
    /// Request timeout in seconds; timeouts abort the transport and are
    /// reported as a distinct failure kind
    pub timeout_secs: u64,
}

impl ServiceConfig {
    /// Validate the service settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "service.base_url".to_string(),
                reason: "no scanning service endpoint configured; set service.base_url in the \
                         config file or the EXPOSURE_BASE_URL environment variable"
                    .to_string(),
            });
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "service.base_url".to_string(),
                reason: format!("expected an http(s) URL, got '{}'", self.base_url),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "service.timeout_secs".to_string(),
                reason: "timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Ambient environment attributes contributed to the fingerprint.
///
/// A native client has no browser screen to read, so display metrics
/// are configured here; the probe treats them as the host's ambient
/// values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Client user-agent string (also sent on HTTP requests)
    pub user_agent: String,
    /// Screen width in pixels
    pub screen_width: u32,
    /// Screen height in pixels
    pub screen_height: u32,
    /// Device pixel ratio
    pub pixel_ratio: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            user_agent: "Exposure/0.1.0 (+https://github.com/cyber-exposure/exposure)".to_string(),
            screen_width: 1920,
            screen_height: 1080,
            pixel_ratio: 1.0,
        }
    }
}
