//! Application configuration loaded from environment variables.

use std::env;

use folio_infra::{DatabaseConfig, S3Config};

/// Configuration errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Token every upload must present.
    pub shared_secret: String,
    /// Empty means no cross-origin access.
    pub allowed_origins: Vec<String>,
    pub database: Option<DatabaseConfig>,
    pub blob_store: Option<S3Config>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let shared_secret = env::var("SHARED_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("SHARED_SECRET"))?;

        let database = match env::var("DATABASE_URL") {
            Ok(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or("DB_MAX_CONNECTIONS", 20)?,
                min_connections: parse_or("DB_MIN_CONNECTIONS", 2)?,
            }),
            Err(_) => None,
        };

        let blob_store = env::var("BLOB_BUCKET").ok().map(|bucket| S3Config {
            bucket,
            endpoint_url: env::var("BLOB_ENDPOINT_URL").ok(),
            region: env::var("BLOB_REGION").unwrap_or_else(|_| "auto".to_string()),
            access_key_id: env::var("BLOB_ACCESS_KEY_ID").ok(),
            secret_access_key: env::var("BLOB_SECRET_ACCESS_KEY").ok(),
        });

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080)?,
            shared_secret,
            allowed_origins: parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
            database,
            blob_store,
        })
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

/// Comma-separated list; blanks are dropped.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
