//! # infra_config: Front-end Configuration
//!
//! Loads the settings shared by the page controllers and the `finrisk` CLI.
//!
//! Priority (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (`FINRISK_*`)
//! 3. Config file (TOML)
//! 4. Default values

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the API base URL.
pub const ENV_BASE_URL: &str = "FINRISK_BASE_URL";
/// Environment variable holding the log level.
pub const ENV_LOG_LEVEL: &str = "FINRISK_LOG_LEVEL";
/// Environment variable holding the request timeout in seconds (`0` disables it).
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "FINRISK_REQUEST_TIMEOUT_SECS";
/// Environment variable holding the download directory.
pub const ENV_DOWNLOAD_DIR: &str = "FINRISK_DOWNLOAD_DIR";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid base URL '{0}'. Must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Invalid request timeout: {0}")]
    InvalidTimeout(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Verbosity of the log output, as accepted by `FINRISK_LOG_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Directive handed to the tracing `EnvFilter`
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.directive().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::InvalidLogLevel(s.to_string()))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.directive())
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// Front-end configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontConfig {
    /// Base URL of the simulation API, without trailing slash
    pub base_url: String,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Request timeout in seconds; `None` (or `0` before validation) waits indefinitely
    pub request_timeout_secs: Option<u64>,
    /// Directory where downloaded reports are written
    pub download_dir: PathBuf,
}

impl Default for FrontConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            log_level: LogLevel::Info,
            request_timeout_secs: None,
            download_dir: PathBuf::from("."),
        }
    }
}

/// Overrides coming from the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Base URL override
    pub base_url: Option<String>,
    /// Log level override
    pub log_level: Option<String>,
    /// Download directory override
    pub download_dir: Option<PathBuf>,
}

impl FrontConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply `FINRISK_*` environment variable overrides
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_env_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }

        if let Some(timeout) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(timeout.clone()))?;
            self.request_timeout_secs = (secs > 0).then_some(secs);
        }

        if let Some(dir) = lookup(ENV_DOWNLOAD_DIR) {
            self.download_dir = PathBuf::from(dir);
        }

        Ok(self)
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(log_level) = &cli.log_level {
            if let Ok(level) = LogLevel::from_str(log_level) {
                self.log_level = level;
            } else {
                tracing::warn!(log_level = %log_level, "Ignoring unknown log level override");
            }
        }
        if let Some(dir) = &cli.download_dir {
            self.download_dir = dir.clone();
        }
    }

    /// Validate the configuration, normalise the base URL and turn a zero
    /// timeout into no timeout
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            errors.push(ConfigError::InvalidBaseUrl(self.base_url.clone()).to_string());
        }

        if self.download_dir.as_os_str().is_empty() {
            errors.push("download_dir cannot be empty".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
        if self.request_timeout_secs == Some(0) {
            self.request_timeout_secs = None;
        }
        Ok(())
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Build configuration from all sources
pub fn build_config(cli: &CliOverrides) -> Result<FrontConfig, ConfigError> {
    let config = match &cli.config_file {
        Some(path) if path.exists() => FrontConfig::from_file(path)?,
        Some(path) => {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            FrontConfig::default()
        }
        None => FrontConfig::default(),
    };

    let mut config = config.with_env_override()?;
    config.merge_with_cli(cli);
    config.validate()?;

    Ok(config)
}
