//! Configuration management for the ERP record workbench

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Database configuration (permission seeding)
    pub database: DatabaseConfig,

    /// Record list configuration
    #[serde(default)]
    pub records: RecordsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Integration harness configuration
    #[serde(default)]
    pub harness: HarnessConfig,

    /// Load test configuration
    #[serde(default)]
    pub load: LoadConfig,
}

/// REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// URL of the front end served to browsers
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Login user name used by tools
    #[serde(default = "default_username")]
    pub username: String,

    /// Login password used by tools
    #[serde(default = "default_password")]
    pub password: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
}

/// Record list configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsConfig {
    /// Rows per page in list views
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Artificial latency for in-memory repositories, in milliseconds
    #[serde(default)]
    pub simulated_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, compact or pretty)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Append log lines to this file instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Integration harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_harness_timeout")]
    pub request_timeout: u64,

    /// Resources whose list endpoint is exercised after login
    #[serde(default = "default_harness_resources")]
    pub resources: Vec<String>,
}

/// Load test configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// 95th percentile latency threshold in milliseconds
    #[serde(default = "default_p95_threshold_ms")]
    pub p95_threshold_ms: u64,

    /// Maximum tolerated error rate (0.0 - 1.0)
    #[serde(default = "default_max_error_rate")]
    pub max_error_rate: f64,

    /// Pause between iterations of one virtual user, in milliseconds
    #[serde(default = "default_think_time_ms")]
    pub think_time_ms: u64,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

const fn default_request_timeout() -> u64 {
    30
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "admin123".to_string()
}

const fn default_max_connections() -> u32 {
    10
}

const fn default_min_connections() -> u32 {
    1
}

const fn default_connect_timeout() -> u64 {
    30
}

const fn default_idle_timeout() -> u64 {
    600
}

const fn default_page_size() -> usize {
    10
}

const fn default_harness_timeout() -> u64 {
    10
}

fn default_harness_resources() -> Vec<String> {
    ["users", "menus", "invoices", "assets", "notices", "approvals"]
        .into_iter()
        .map(String::from)
        .collect()
}

const fn default_p95_threshold_ms() -> u64 {
    2000
}

const fn default_max_error_rate() -> f64 {
    0.10
}

const fn default_think_time_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Config {
    /// Load configuration from an optional `erp.toml` and `ERP__*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        Self::load_from("erp")
    }

    /// Load configuration from the given file stem (extension optional) and the environment
    ///
    /// A missing file is not an error; defaults and the environment apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load_from(path: &str) -> crate::Result<Self> {
        Self::build(path, false)
    }

    /// Load configuration from a file the user named explicitly, plus the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be parsed.
    pub fn load_file(path: &Path) -> crate::Result<Self> {
        Self::build(&path.to_string_lossy(), true)
    }

    fn build(path: &str, required: bool) -> crate::Result<Self> {
        let defaults = Self::default();
        let config = config::Config::builder()
            .set_default("database.url", defaults.database.url)?
            .add_source(config::File::with_name(path).required(required))
            .add_source(config::Environment::with_prefix("ERP").separator("__"))
            .build()?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;
        tracing::debug!(
            source = path,
            api = %loaded.api.base_url,
            page_size = loaded.records.page_size,
            "configuration loaded"
        );
        Ok(loaded)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            frontend_url: default_frontend_url(),
            request_timeout: default_request_timeout(),
            username: default_username(),
            password: default_password(),
        }
    }
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            simulated_delay_ms: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Apply command-line overrides: an explicit level, and JSON output when requested
    #[must_use]
    pub fn with_overrides(mut self, level: Option<&str>, json: bool) -> Self {
        if let Some(level) = level {
            level.clone_into(&mut self.level);
        }
        if json {
            "json".clone_into(&mut self.format);
        }
        self
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_harness_timeout(),
            resources: default_harness_resources(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            p95_threshold_ms: default_p95_threshold_ms(),
            max_error_rate: default_max_error_rate(),
            think_time_ms: default_think_time_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let database_url = std::env::var("ERP__DATABASE__URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .unwrap_or_else(|_| "postgresql://localhost/erp".to_string());

        Self {
            api: ApiConfig::default(),
            database: DatabaseConfig {
                url: database_url,
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                connect_timeout: default_connect_timeout(),
                idle_timeout: default_idle_timeout(),
            },
            records: RecordsConfig::default(),
            logging: LoggingConfig::default(),
            harness: HarnessConfig::default(),
            load: LoadConfig::default(),
        }
    }
}
