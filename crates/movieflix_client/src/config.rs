//! crates/movieflix_client/src/config.rs
//!
//! Configuration for the device-side clients, loaded from environment
//! variables. The `.env` file is used for local development.

use std::path::PathBuf;
use std::time::Duration;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all client configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the first-party auth server.
    pub backend_url: String,
    /// Base URL of the third-party movie catalog API.
    pub catalog_base_url: String,
    /// Read-only bearer credential issued by the catalog provider.
    /// Unrelated to the first-party session token.
    pub catalog_token: Option<String>,
    pub catalog_language: String,
    /// Bound applied to every network call; a timeout surfaces as an error
    /// rather than a hang.
    pub request_timeout: Duration,
    /// Where the current session token is persisted between launches.
    pub token_path: PathBuf,
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let backend_url = std::env::var("BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let catalog_base_url = std::env::var("CATALOG_BASE_URL")
            .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string());

        let catalog_token = std::env::var("CATALOG_TOKEN").ok();

        let catalog_language =
            std::env::var("CATALOG_LANGUAGE").unwrap_or_else(|_| "en-US".to_string());

        let timeout_str =
            std::env::var("REQUEST_TIMEOUT_SECS").unwrap_or_else(|_| "10".to_string());
        let timeout_secs = timeout_str.parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(
                "REQUEST_TIMEOUT_SECS".to_string(),
                format!("'{}' is not a valid number of seconds", timeout_str),
            )
        })?;

        let token_path = std::env::var("TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".movieflix/session-token"));

        Ok(Self {
            backend_url,
            catalog_base_url,
            catalog_token,
            catalog_language,
            request_timeout: Duration::from_secs(timeout_secs),
            token_path,
        })
    }
}
