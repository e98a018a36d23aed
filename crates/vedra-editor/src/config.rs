//! Configuration for vedra-editor
//!
//! Centralized configuration for intake limits, the metadata repository API,
//! the section completeness table and the handling of programmer errors.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::completeness::CompletenessTable;
use crate::intake::CapacityLimits;

/// Environment variable overriding [`ApiConfig::base_url`]
pub const API_BASE_ENV: &str = "VEDRA_RDM_API_BASE";

/// Editor-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// What to do with programmer errors from the mutation engine
    pub misuse: MisusePolicy,
    /// File intake limits
    pub limits: CapacityLimits,
    /// Metadata repository API settings
    pub api: ApiConfig,
    /// Declared per-section requirements
    pub completeness: CompletenessTable,
}

/// Metadata repository API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the repository API
    pub base_url: String,
    /// Timeout for each repository call in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Public site that share links point to
    pub share_base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            user_agent: "vedra/0.1".to_string(),
            share_base_url: "https://vedra.com".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Handling of mutation-engine programmer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MisusePolicy {
    /// Panic at the call site
    Panic,
    /// Log at error level and leave the record unchanged
    Ignore,
}

impl Default for MisusePolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            MisusePolicy::Panic
        } else {
            MisusePolicy::Ignore
        }
    }
}

impl EditorConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Platform config file location, e.g. `~/.config/vedra/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vedra").join("config.toml"))
    }

    /// Read a TOML file, apply environment overrides and validate
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_toml(&text)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) if p.exists() => p,
            _ => {
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                return Ok(config);
            }
        };
        Self::load(&path)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(API_BASE_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = base.trim().to_string();
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_files == 0 {
            return Err(ConfigError::OutOfRange(
                "limits.max_files must be positive".to_string(),
            ));
        }

        if self.limits.max_total_bytes == 0 {
            return Err(ConfigError::OutOfRange(
                "limits.max_total_bytes must be positive".to_string(),
            ));
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange(
                "api.timeout_secs must be positive".to_string(),
            ));
        }

        for (name, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.share_base_url", &self.api.share_base_url),
        ] {
            let parsed = url::Url::parse(value)
                .map_err(|e| ConfigError::InvalidUrl(format!("{}: {} ({})", name, value, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl(format!(
                    "{}: {} is not an http(s) URL",
                    name, value
                )));
            }
        }

        self.completeness.validate()
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),
    /// Malformed URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Required field is missing
    #[error("Missing field: {0}")]
    MissingField(String),
    /// Inconsistent value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    /// TOML syntax or shape error
    #[error("Parse error: {0}")]
    Parse(String),
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(String),
}
