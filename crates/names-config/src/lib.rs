//! Configuration module for the names engine service.

use serde::Deserialize;
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Path to the 99-names catalog JSON document.
    pub catalog_path: String,
    /// Address the health/ready HTTP surface binds to.
    pub bind_address: String,
    /// Bound size of the storage connection pool.
    pub max_db_connections: u32,
}

impl AppConfig {
    /// Loads configuration from the process environment, applying a
    /// `.env` file first if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env_var("DATABASE_URL")?,
            catalog_path: env_var_or("CATALOG_PATH", "./catalog.json"),
            bind_address: env_var_or("BIND_ADDRESS", "0.0.0.0:8080"),
            max_db_connections: env_var_parsed_or("MAX_DB_CONNECTIONS", 10)?,
        })
    }
}

fn env_var(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

fn env_var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_var_parsed_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_or_uses_default() {
        let val = env_var_or("NAMES_ENGINE_NON_EXISTENT_VAR", "default_value");
        assert_eq!(val, "default_value");
    }

    #[test]
    fn env_var_parsed_or_rejects_unparsable_values() {
        std::env::set_var("NAMES_ENGINE_BAD_INT", "not-a-number");
        let err = env_var_parsed_or::<u32>("NAMES_ENGINE_BAD_INT", 5).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_, _)));
        std::env::remove_var("NAMES_ENGINE_BAD_INT");
    }
}
