//! # Application Configuration
//!
//! Settings for the storage pool, logging and the analytics layer.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     COMMERCE_DB_PATH=/var/lib/commerce/commerce.db                      │
//! │     COMMERCE_MAX_CONNECTIONS=8                                          │
//! │     COMMERCE_LOG_FILTER=debug                                           │
//! │     COMMERCE_MAX_TOP_SELLERS=50                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/commerce-manager/commerce.toml (Linux)                    │
//! │     ~/Library/Application Support/com.commerce.manager/... (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # commerce.toml
//! [database]
//! path = "commerce.db"
//! max_connections = 5
//! min_connections = 1
//! connect_timeout_secs = 30
//! idle_timeout_secs = 600
//!
//! [logging]
//! filter = "info,commerce=debug,sqlx=warn"
//!
//! [analytics]
//! max_top_sellers = 100
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use commerce_core::DEFAULT_MAX_TOP_SELLERS;
use commerce_db::DbConfig;

use crate::telemetry::DEFAULT_LOG_FILTER;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file path, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("com", "commerce", "manager")
        .map(|dirs| dirs.data_dir().join("commerce.db"))
        .unwrap_or_else(|| PathBuf::from("commerce.db"))
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Analytics Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// Largest `limit` accepted by the best-seller queries.
    #[serde(default = "default_max_top_sellers")]
    pub max_top_sellers: i64,
}

fn default_max_top_sellers() -> i64 {
    DEFAULT_MAX_TOP_SELLERS
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        AnalyticsSettings {
            max_top_sellers: default_max_top_sellers(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (commerce.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Configuration for an isolated in-memory database.
    pub fn in_memory() -> Self {
        let mut config = Self::default();
        config.database.path = PathBuf::from(":memory:");
        config.database.max_connections = 1;
        config.database.min_connections = 1;
        config
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let db = &self.database;

        if db.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if db.min_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.min_connections must be greater than 0".into(),
            ));
        }

        if db.min_connections > db.max_connections {
            return Err(ConfigError::Invalid(format!(
                "database.min_connections ({}) exceeds max_connections ({})",
                db.min_connections, db.max_connections
            )));
        }

        if self.analytics.max_top_sellers <= 0 {
            return Err(ConfigError::Invalid(
                "analytics.max_top_sellers must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Builds the pool configuration for `commerce-db`.
    pub fn to_db_config(&self) -> DbConfig {
        let db = &self.database;
        DbConfig::new(db.path.clone())
            .max_connections(db.max_connections)
            .min_connections(db.min_connections)
            .connect_timeout(Duration::from_secs(db.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(db.idle_timeout_secs))
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("COMMERCE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Ok(max) = std::env::var("COMMERCE_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring non-numeric COMMERCE_MAX_CONNECTIONS"),
            }
        }

        if let Ok(filter) = std::env::var("COMMERCE_LOG_FILTER") {
            self.logging.filter = filter;
        }

        if let Ok(max) = std::env::var("COMMERCE_MAX_TOP_SELLERS") {
            match max.parse::<i64>() {
                Ok(n) => self.analytics.max_top_sellers = n,
                Err(_) => warn!(value = %max, "Ignoring non-numeric COMMERCE_MAX_TOP_SELLERS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "commerce", "manager")
            .map(|dirs| dirs.config_dir().join("commerce.toml"))
    }
}
