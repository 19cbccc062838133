//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/journeyscope/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/journeyscope/` (~/.config/journeyscope/)
//! - State/Logs: `$XDG_STATE_HOME/journeyscope/` (~/.local/state/journeyscope/)

use crate::error::{Error, Result};
use crate::journey::AggregateOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    /// Journey query API (optional, only needed for `fetch`)
    #[serde(default)]
    pub api: ApiConfig,

    /// Journey filtering defaults
    #[serde(default)]
    pub journey: JourneyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Query API configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the query backend (e.g., `https://analytics.example.com/api`)
    pub base_url: Option<String>,

    /// Bearer token, if the backend requires one
    pub api_key: Option<String>,

    /// Website used when `fetch` is called without `--website`
    pub website_id: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,

    /// Max retry attempts for transient failures
    #[serde(default = "default_api_max_retries")]
    pub max_retries: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            website_id: None,
            timeout_secs: default_api_timeout(),
            max_retries: default_api_max_retries(),
        }
    }
}

impl ApiConfig {
    /// Check if the API is configured well enough to issue requests
    pub fn is_ready(&self) -> bool {
        self.base_url.is_some()
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        let Some(base_url) = self.base_url.as_deref() else {
            return Err(Error::Config(
                "api.base_url is required to fetch journeys".to_string(),
            ));
        };
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "api.base_url must start with http:// or https://, got {:?}",
                base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_api_timeout() -> u64 {
    30
}

fn default_api_max_retries() -> usize {
    3
}

/// Journey filtering defaults
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JourneyConfig {
    /// Event names removed from every path before aggregation
    #[serde(default)]
    pub excluded_events: Vec<String>,

    /// Detail keys stripped from every step (noisy fields)
    #[serde(default = "default_dropped_detail_keys")]
    pub dropped_detail_keys: Vec<String>,

    /// Path depth requested from the API
    #[serde(default = "default_steps")]
    pub steps: u32,

    /// Number of journeys requested from the API
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            excluded_events: vec![],
            dropped_detail_keys: default_dropped_detail_keys(),
            steps: default_steps(),
            limit: default_limit(),
        }
    }
}

impl JourneyConfig {
    /// Build aggregation options from the configured defaults plus any
    /// extra exclusions given at the call site.
    pub fn aggregate_options<I, S>(&self, extra_excluded: I) -> AggregateOptions
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = AggregateOptions {
            excluded_events: self.excluded_events.iter().cloned().collect(),
            dropped_detail_keys: self.dropped_detail_keys.clone(),
        };
        options
            .excluded_events
            .extend(extra_excluded.into_iter().map(Into::into));
        options
    }
}

fn default_dropped_detail_keys() -> Vec<String> {
    vec!["scrollPercent".to_string()]
}

fn default_steps() -> u32 {
    5
}

fn default_limit() -> u32 {
    30
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/journeyscope/config.toml` (~/.config/journeyscope/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("journeyscope").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/journeyscope/` (~/.local/state/journeyscope/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("journeyscope")
    }
}
