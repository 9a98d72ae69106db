//! Configuration management for the server.

use std::env;
use std::time::Duration;

/// Default OData filter restricting the sync to the relevant item groups.
const DEFAULT_ITEM_FILTER: &str =
    "ItemsGroupCode eq 100 or ItemsGroupCode eq 101 or ItemsGroupCode eq 121";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Shared secret required by the sync trigger endpoint
    pub cron_secret: String,
    /// Base URL of the remote Service Layer API
    pub external_api_url: String,
    /// Remote company database name
    pub company_db: String,
    /// Remote login user
    pub user_name: String,
    /// Remote login password
    pub password: String,
    /// OData `$filter` applied to the items collection
    pub item_filter: String,
    /// Items fetched per page
    pub page_size: i64,
    /// Concurrent page-fetch workers
    pub fetch_workers: usize,
    /// Deadline for the whole fetch phase
    pub fetch_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let page_size: i64 = parse_or("SYNC_PAGE_SIZE", 20)?;
        if page_size <= 0 {
            return Err(ConfigError::InvalidValue("SYNC_PAGE_SIZE"));
        }

        let fetch_workers: usize = parse_or("SYNC_FETCH_WORKERS", 4)?;
        if fetch_workers == 0 {
            return Err(ConfigError::InvalidValue("SYNC_FETCH_WORKERS"));
        }

        let timeout_secs: u64 = parse_or("SYNC_FETCH_TIMEOUT_SECS", 60)?;

        Ok(Self {
            host,
            port,
            database_url: required("DATABASE_URL")?,
            cron_secret: required("CRON_SECRET")?,
            external_api_url: required("EXTERNAL_API_URL")?,
            company_db: required("COMPANY_DB")?,
            user_name: required("USER_NAME")?,
            password: required("PASSWORD")?,
            item_filter: env::var("ITEM_FILTER")
                .unwrap_or_else(|_| DEFAULT_ITEM_FILTER.to_string()),
            page_size,
            fetch_workers,
            fetch_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("Invalid value for {0}")]
    InvalidValue(&'static str),
}
