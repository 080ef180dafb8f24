//! Configuration module
//!
//! Settings come from the process environment (a `.env` file is loaded first
//! when present). Nothing is read from the command line.

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_CONTAINER_NAME, DEFAULT_ROUTE_PREFIX};
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 5000;
const MAX_REQUEST_BODY_MB: usize = 32;
const LOCAL_STORAGE_PATH: &str = "./data/blobs";
const LOCAL_STORAGE_BASE_URL: &str = "http://localhost:5000/blobs";
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:8080",
    "https://localhost:8080",
    "http://localhost:3000",
    "https://localhost:3000",
];

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub route_prefix: String,
    pub cors_origins: Vec<String>,
    /// Echo internal error text to clients in `detailedError`. Off unless set.
    pub show_detailed_errors: bool,
    pub max_request_body_bytes: usize,
    pub log_format: LogFormat,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub azure_connection_string: Option<String>,
    pub container_name: String,
    pub local_storage_path: PathBuf,
    pub local_storage_base_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            show_detailed_errors: false,
            max_request_body_bytes: MAX_REQUEST_BODY_MB * 1024 * 1024,
            log_format: LogFormat::Text,
            storage_backend: StorageBackend::Azure,
            azure_connection_string: None,
            container_name: DEFAULT_CONTAINER_NAME.to_string(),
            local_storage_path: PathBuf::from(LOCAL_STORAGE_PATH),
            local_storage_base_url: LOCAL_STORAGE_BASE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Config::default();

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or(defaults.environment);

        let server_port = match get("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => defaults.server_port,
        };

        let cors_origins = match get("CORS_ORIGINS") {
            Some(origins) => origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        let show_detailed_errors = match get("SHOW_DETAILED_ERRORS") {
            Some(flag) => parse_bool(&flag).ok_or_else(|| {
                anyhow::anyhow!("SHOW_DETAILED_ERRORS must be true or false, got '{}'", flag)
            })?,
            None => false,
        };

        let max_request_body_mb = get("MAX_REQUEST_BODY_MB")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(MAX_REQUEST_BODY_MB)
            .max(1);

        let log_format = match get("LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let storage_backend = match get("STORAGE_BACKEND") {
            Some(backend) => backend.parse()?,
            None => defaults.storage_backend,
        };

        Ok(Config {
            server_port,
            environment,
            route_prefix: get("ROUTE_PREFIX")
                .map(|p| p.trim_end_matches('/').to_string())
                .unwrap_or(defaults.route_prefix),
            cors_origins,
            show_detailed_errors,
            max_request_body_bytes: max_request_body_mb * 1024 * 1024,
            log_format,
            storage_backend,
            azure_connection_string: get("AZURE_STORAGE_CONNECTION_STRING"),
            container_name: get("AZURE_STORAGE_CONTAINER_NAME")
                .unwrap_or(defaults.container_name),
            local_storage_path: get("LOCAL_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.local_storage_path),
            local_storage_base_url: get("LOCAL_STORAGE_BASE_URL")
                .unwrap_or(defaults.local_storage_base_url),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage_backend == StorageBackend::Azure && self.azure_connection_string.is_none()
        {
            return Err(anyhow::anyhow!(
                "AZURE_STORAGE_CONNECTION_STRING must be set when using the azure storage backend"
            ));
        }

        validate_container_name(&self.container_name)?;

        if !self.route_prefix.is_empty() && !self.route_prefix.starts_with('/') {
            return Err(anyhow::anyhow!(
                "ROUTE_PREFIX must start with '/', got '{}'",
                self.route_prefix
            ));
        }

        if self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot contain '*' because credentials are allowed. Please specify explicit origins."
            ));
        }

        for origin in &self.cors_origins {
            if !is_valid_origin(origin) {
                return Err(anyhow::anyhow!("Invalid CORS origin: '{}'", origin));
            }
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Blob container names: 3-63 chars of lowercase letters, digits and single
/// hyphens, starting and ending with a letter or digit.
fn validate_container_name(name: &str) -> Result<(), anyhow::Error> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !(3..=63).contains(&name.len())
        || !valid_chars
        || name.starts_with('-')
        || name.ends_with('-')
        || name.contains("--")
    {
        return Err(anyhow::anyhow!(
            "AZURE_STORAGE_CONTAINER_NAME '{}' is not a valid container name",
            name
        ));
    }
    Ok(())
}

/// `scheme://host[:port]` with no path, as browsers send in `Origin`.
fn is_valid_origin(origin: &str) -> bool {
    match origin.split_once("://") {
        Some((scheme, rest)) => {
            matches!(scheme, "http" | "https") && !rest.is_empty() && !rest.contains('/')
        }
        None => false,
    }
}
