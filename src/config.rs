//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::records::SLAUGHTER_THRESHOLD_DAYS;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Minimum batch age (days) for slaughter
    pub slaughter_threshold_days: i64,

    /// Delay before a breeding reminder fires
    pub reminder_delay: Duration,

    /// How long a notification stays on screen
    pub notification_timeout: Duration,

    /// Fixed seed for the randomized growth stage
    pub growth_seed: Option<u64>,

    /// Emit JSON log lines
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 5)?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = parse_or("PORT", 3000)?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let slaughter_threshold_days =
            parse_or("SLAUGHTER_THRESHOLD_DAYS", SLAUGHTER_THRESHOLD_DAYS)?;

        let reminder_delay = Duration::from_secs(parse_or("REMINDER_DELAY_SECS", 86_400)?);

        let notification_timeout =
            Duration::from_secs(parse_or("NOTIFICATION_TIMEOUT_SECS", 10)?);

        let growth_seed = match env::var("GROWTH_SEED") {
            Ok(raw) => Some(
                raw.parse()
                    .map_err(|_| ConfigError::InvalidValue("GROWTH_SEED"))?,
            ),
            Err(_) => None,
        };

        let log_json = env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            slaughter_threshold_days,
            reminder_delay,
            notification_timeout,
            growth_seed,
            log_json,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Settings the herd handlers are built from
    pub fn herd_settings(&self) -> HerdSettings {
        HerdSettings {
            slaughter_threshold_days: self.slaughter_threshold_days,
            reminder_delay: self.reminder_delay,
            notification_timeout: self.notification_timeout,
            growth_seed: self.growth_seed,
        }
    }
}

/// Handler settings, independent of the database and server
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HerdSettings {
    pub slaughter_threshold_days: i64,
    pub reminder_delay: Duration,
    pub notification_timeout: Duration,
    pub growth_seed: Option<u64>,
}

impl Default for HerdSettings {
    fn default() -> Self {
        Self {
            slaughter_threshold_days: SLAUGHTER_THRESHOLD_DAYS,
            reminder_delay: Duration::from_secs(86_400),
            notification_timeout: Duration::from_secs(10),
            growth_seed: None,
        }
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
