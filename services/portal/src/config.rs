//! services/portal/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Public origin of the portal, used to build full page-view URLs.
    pub site_base_url: String,
    /// Measurement endpoint the analytics adapter posts event batches to.
    pub analytics_endpoint: String,
    /// When either credential is absent the service falls back to the
    /// logging-only analytics sink.
    pub analytics_measurement_id: Option<String>,
    pub analytics_api_secret: Option<String>,
    /// Base URL of the session provider; absent means every visitor is a guest.
    pub session_service_url: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let site_base_url = std::env::var("SITE_BASE_URL")
            .unwrap_or_else(|_| "https://portal.apacg.org".to_string());

        // --- Load Collaborator Settings ---
        let analytics_endpoint = std::env::var("ANALYTICS_ENDPOINT")
            .unwrap_or_else(|_| "https://www.google-analytics.com/mp/collect".to_string());
        let analytics_measurement_id = std::env::var("ANALYTICS_MEASUREMENT_ID").ok();
        let analytics_api_secret = std::env::var("ANALYTICS_API_SECRET").ok();
        let session_service_url = std::env::var("SESSION_SERVICE_URL").ok();

        Ok(Self {
            bind_address,
            log_level,
            site_base_url,
            analytics_endpoint,
            analytics_measurement_id,
            analytics_api_secret,
            session_service_url,
        })
    }
}
