//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use crate::models::TravelType;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

const DEFAULT_API_BASE_URL: &str = "http://localhost:9191/api";
const DEFAULT_TOKEN_FILE: &str = ".wanderly/tokens.json";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Versioned API base, e.g. `https://host/api`
    pub api_base_url: String,
    /// Where the credential pair is persisted
    pub token_file: PathBuf,
    /// Per-request timeout for backend calls
    pub request_timeout: Duration,
    /// Travel mode used when resolving directions
    pub travel_type: TravelType,
    /// City loaded by the demo binary
    pub city_id: Option<Uuid>,
    /// Login email used when no tokens are stored
    pub email: Option<String>,
    /// Login password used when no tokens are stored
    pub password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let request_timeout_secs = match env::var("WANDERLY_REQUEST_TIMEOUT_SECS") {
            Ok(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("WANDERLY_REQUEST_TIMEOUT_SECS", v))?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let travel_type = match env::var("WANDERLY_TRAVEL_TYPE") {
            Ok(v) => TravelType::parse(&v).ok_or(ConfigError::Invalid("WANDERLY_TRAVEL_TYPE", v))?,
            Err(_) => TravelType::Foot,
        };

        let city_id = match env::var("WANDERLY_CITY_ID") {
            Ok(v) => Some(
                Uuid::parse_str(v.trim()).map_err(|_| ConfigError::Invalid("WANDERLY_CITY_ID", v))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            api_base_url: env::var("WANDERLY_API_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            token_file: env::var("WANDERLY_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_FILE)),
            request_timeout: Duration::from_secs(request_timeout_secs),
            travel_type,
            city_id,
            email: env::var("WANDERLY_EMAIL").ok(),
            password: env::var("WANDERLY_PASSWORD").ok(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            api_base_url: "http://localhost:9191/api".to_string(),
            token_file: PathBuf::from("test-tokens.json"),
            request_timeout: Duration::from_secs(5),
            travel_type: TravelType::Foot,
            city_id: None,
            email: None,
            password: None,
        }
    }

    /// Login credentials, if both are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
