//! Configuration loading and representation.
//!
//! Everything comes from environment variables; unset variables fall back to
//! defaults, malformed ones are errors.

use thiserror::Error;

use remindr_observability::{LogFormat, LoggingConfig};

pub const LOG_FILTER_VAR: &str = "REMINDR_LOG";
pub const LOG_FORMAT_VAR: &str = "REMINDR_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = LoggingConfig::default();

        let filter = lookup(LOG_FILTER_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.filter);

        let format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: LOG_FORMAT_VAR,
                    reason: e.to_string(),
                })?,
            None => defaults.format,
        };

        Ok(Self {
            logging: LoggingConfig { filter, format },
        })
    }
}
