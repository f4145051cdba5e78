//! # Client Configuration
//!
//! Configuration management for the taskq client library and CLI.
//! Supports environment variables, config files, and command-line overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Client configuration for the task service connection and result polling
///
/// # Examples
///
/// ```rust
/// use taskq_client::config::ClientConfig;
///
/// let config = ClientConfig::default();
/// assert_eq!(config.service.base_url, "http://localhost:5000");
/// assert_eq!(config.polling.interval_ms, 1000);
/// ```
///
/// ```rust,no_run
/// use taskq_client::config::ClientConfig;
///
/// // Load configuration from environment and config files
/// let config = ClientConfig::load().expect("Failed to load config");
/// println!("Service URL: {}", config.service.base_url);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Task service endpoint
    pub service: ServiceConfig,
    /// Result polling schedule
    pub polling: PollingConfig,
}

/// Task service endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL for the service (e.g., "<http://localhost:5000>"), used verbatim
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_ms: 30000,
        }
    }
}

/// Result polling configuration
///
/// The defaults reproduce a fixed one-second poll with no limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay between the first and second poll, in milliseconds
    pub interval_ms: u64,
    /// Growth factor applied to the delay after each poll (1.0 = fixed)
    pub backoff_multiplier: f64,
    /// Upper bound for the delay between polls, in milliseconds
    pub max_interval_ms: u64,
    /// Give up after this many polls
    pub max_attempts: Option<u32>,
    /// Give up once this much time has passed, in milliseconds
    pub max_wait_ms: Option<u64>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            backoff_multiplier: 1.0,
            max_interval_ms: 30000,
            max_attempts: None,
            max_wait_ms: None,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl ClientConfig {
    /// Configuration with defaults and the given base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            service: ServiceConfig {
                base_url: base_url.into(),
                ..ServiceConfig::default()
            },
            ..Self::default()
        }
    }

    /// Load configuration from environment variables and config file
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (first of `./taskq-client.toml`, `./config/taskq-client.toml`,
    ///    `~/.taskq/config.toml`, `<config dir>/taskq/client.toml`)
    /// 3. Default values
    pub fn load() -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::find_config_file() {
            debug!("Loading config from: {}", config_path.display());
            match Self::load_from_file(&config_path) {
                Ok(file_config) => config = file_config,
                Err(e) => {
                    debug!("Failed to load config file: {}", e);
                }
            }
        }

        config.apply_env_overrides();

        debug!("Loaded client configuration: {:?}", config);
        Ok(config)
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::config_error(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ClientError::config_error(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    fn find_config_file() -> Option<PathBuf> {
        let mut possible_paths = vec![
            PathBuf::from("./taskq-client.toml"),
            PathBuf::from("./config/taskq-client.toml"),
        ];
        if let Some(home) = dirs::home_dir() {
            possible_paths.push(home.join(".taskq").join("config.toml"));
        }
        if let Some(config_dir) = dirs::config_dir() {
            possible_paths.push(config_dir.join("taskq").join("client.toml"));
        }

        possible_paths
            .into_iter()
            .find(|path| path.exists() && path.is_file())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("TASKQ_SERVICE_URL") {
            self.service.base_url = url;
        }
        if let Some(timeout_ms) = parse_env("TASKQ_TIMEOUT_MS") {
            self.service.timeout_ms = timeout_ms;
        }
        if let Some(interval_ms) = parse_env("TASKQ_POLL_INTERVAL_MS") {
            self.polling.interval_ms = interval_ms;
        }
        if let Some(max_attempts) = parse_env("TASKQ_POLL_MAX_ATTEMPTS") {
            self.polling.max_attempts = Some(max_attempts);
        }
        if let Some(max_wait_ms) = parse_env("TASKQ_POLL_MAX_WAIT_MS") {
            self.polling.max_wait_ms = Some(max_wait_ms);
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> ClientResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClientError::config_error(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ClientError::config_error(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            ClientError::config_error(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get default config file path
    pub fn default_config_path() -> ClientResult<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| ClientError::config_error("Could not determine home directory"))?;

        Ok(home_dir.join(".taskq").join("config.toml"))
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!(variable = name, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}
