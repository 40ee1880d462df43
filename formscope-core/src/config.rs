//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/formscope/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/formscope/` (~/.config/formscope/)
//! - Data: `$XDG_DATA_HOME/formscope/` (~/.local/share/formscope/)
//! - State/Logs: `$XDG_STATE_HOME/formscope/` (~/.local/state/formscope/)

use crate::cache::CacheTtls;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

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

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Cache TTL and storage configuration
#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    /// TTL for form analytics entries, in seconds
    #[serde(default = "default_form_analytics_ttl")]
    pub form_analytics_ttl_secs: u64,

    /// TTL for dashboard stats entries, in seconds
    #[serde(default = "default_dashboard_stats_ttl")]
    pub dashboard_stats_ttl_secs: u64,

    /// TTL for user engagement entries, in seconds
    #[serde(default = "default_user_engagement_ttl")]
    pub user_engagement_ttl_secs: u64,

    /// TTL for raw response snapshots, in seconds
    #[serde(default = "default_form_responses_ttl")]
    pub form_responses_ttl_secs: u64,

    /// Override path for the sqlite cache store (defaults to the data dir)
    pub db_path: Option<PathBuf>,
}

fn default_form_analytics_ttl() -> u64 {
    300
}

fn default_dashboard_stats_ttl() -> u64 {
    300
}

fn default_user_engagement_ttl() -> u64 {
    600
}

fn default_form_responses_ttl() -> u64 {
    180
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            form_analytics_ttl_secs: default_form_analytics_ttl(),
            dashboard_stats_ttl_secs: default_dashboard_stats_ttl(),
            user_engagement_ttl_secs: default_user_engagement_ttl(),
            form_responses_ttl_secs: default_form_responses_ttl(),
            db_path: None,
        }
    }
}

impl CacheConfig {
    /// Convert the configured second counts into a TTL policy.
    pub fn ttls(&self) -> CacheTtls {
        CacheTtls {
            form_analytics: Duration::from_secs(self.form_analytics_ttl_secs),
            dashboard_stats: Duration::from_secs(self.dashboard_stats_ttl_secs),
            user_engagement: Duration::from_secs(self.user_engagement_ttl_secs),
            form_responses: Duration::from_secs(self.form_responses_ttl_secs),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "formscope_core=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }

    /// Path to the config file
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("formscope/config.toml")
    }

    /// Directory for durable data (the sqlite cache store)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("formscope")
    }

    /// Directory for logs
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("formscope")
    }

    /// Path to the sqlite cache store
    pub fn cache_db_path(&self) -> PathBuf {
        self.cache
            .db_path
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("cache.db"))
    }

    /// Path to the log file
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("formscope.log")
    }
}
