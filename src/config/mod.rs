use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Environment variable that overrides `auth.jwt_key`
pub const JWT_KEY_ENV: &str = "KOSAN_JWT_KEY";

/// Longest accepted token lifetime: one year
pub const MAX_JWT_EXPIRED_MIN: i64 = 60 * 24 * 365;

/// Longest accepted per-request database budget: one hour
pub const MAX_QUERY_TIMEOUT_SECS: u64 = 3600;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Symmetric key used to sign and verify access tokens
    #[serde(default)]
    pub jwt_key: String,
    /// Token lifetime in minutes
    #[serde(default = "default_jwt_expired_min")]
    pub jwt_expired_min: i64,
    /// Seed user created on first start when both email and password are set
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    #[serde(default = "default_admin_name")]
    pub admin_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_key: String::new(),
            jwt_expired_min: default_jwt_expired_min(),
            admin_email: None,
            admin_password: None,
            admin_name: default_admin_name(),
        }
    }
}

fn default_jwt_expired_min() -> i64 {
    60
}

fn default_admin_name() -> String {
    "Admin".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Upper bound for the database work of a single request, in seconds
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            query_timeout_secs: default_query_timeout_secs(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite:./data/kosan.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_query_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Master switch; when false nothing is logged regardless of level
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            level: default_log_level(),
        }
    }
}

fn default_logging_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&content)?
        } else {
            info!("No config file found, using defaults");
            Config::default()
        };

        if let Ok(key) = std::env::var(JWT_KEY_ENV) {
            config.auth.jwt_key = key;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse configuration file")
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_key.trim().is_empty() {
            bail!(
                "auth.jwt_key must be set (in the config file or via {})",
                JWT_KEY_ENV
            );
        }
        if !(1..=MAX_JWT_EXPIRED_MIN).contains(&self.auth.jwt_expired_min) {
            bail!(
                "auth.jwt_expired_min must be between 1 and {}",
                MAX_JWT_EXPIRED_MIN
            );
        }
        if !(1..=MAX_QUERY_TIMEOUT_SECS).contains(&self.database.query_timeout_secs) {
            bail!(
                "database.query_timeout_secs must be between 1 and {}",
                MAX_QUERY_TIMEOUT_SECS
            );
        }
        if self.database.max_connections == 0 {
            bail!("database.max_connections must be at least 1");
        }
        Ok(())
    }

    /// Filter directive for the tracing subscriber
    pub fn log_filter(&self) -> &str {
        if self.logging.enabled {
            &self.logging.level
        } else {
            "off"
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
