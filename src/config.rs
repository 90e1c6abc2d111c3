//! Application configuration loaded from environment variables.
//!
//! Google credentials are optional at startup. The OAuth routes answer
//! 500 when they are missing instead of refusing to boot the server.

use chrono::FixedOffset;
use std::env;

use crate::error::AppError;
use crate::time_utils::parse_utc_offset;

/// Default SQLite database location.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://morning_glory.db?mode=rwc";

/// Default offset of the local calendar day (Asia/Seoul).
pub const DEFAULT_LOCAL_UTC_OFFSET: &str = "+09:00";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    /// Google OAuth client ID
    pub google_client_id: Option<String>,
    /// Google OAuth client secret
    pub google_client_secret: Option<String>,
    /// Fixed callback URL; derived from the request Host header when unset
    pub google_redirect_uri: Option<String>,
    /// Production mode marks cookies `Secure`
    pub production: bool,
    /// Frontend dev server allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Offset used to turn "now" into the local check-in date
    pub local_utc_offset: FixedOffset,
    /// Mark the session row revoked when the user logs out
    pub revoke_session_on_logout: bool,
}

/// Client credentials needed for the authorization-code exchange.
#[derive(Debug, Clone)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let offset_raw =
            env::var("LOCAL_UTC_OFFSET").unwrap_or_else(|_| DEFAULT_LOCAL_UTC_OFFSET.to_string());
        let local_utc_offset = parse_utc_offset(&offset_raw)
            .ok_or(ConfigError::Invalid("LOCAL_UTC_OFFSET", offset_raw))?;

        let environment = env::var("NODE_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_default();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            google_client_id: non_empty_var("GOOGLE_CLIENT_ID"),
            google_client_secret: non_empty_var("GOOGLE_CLIENT_SECRET"),
            google_redirect_uri: non_empty_var("GOOGLE_REDIRECT_URI"),
            production: environment.eq_ignore_ascii_case("production"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            local_utc_offset,
            revoke_session_on_logout: env::var("REVOKE_SESSION_ON_LOGOUT")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        })
    }

    /// Deterministic configuration for tests.
    pub fn test_default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            google_client_id: Some("test-client-id".to_string()),
            google_client_secret: Some("test-client-secret".to_string()),
            google_redirect_uri: Some("http://localhost:8080/auth/google/callback".to_string()),
            production: false,
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            local_utc_offset: FixedOffset::east_opt(9 * 3600).expect("valid offset"),
            revoke_session_on_logout: true,
        }
    }

    /// Client ID alone, for building the authorization redirect.
    pub fn google_client_id(&self) -> Result<&str, AppError> {
        self.google_client_id
            .as_deref()
            .ok_or(AppError::OAuthConfig("GOOGLE_CLIENT_ID"))
    }

    /// Full credentials for the token exchange.
    pub fn google_credentials(&self) -> Result<GoogleCredentials, AppError> {
        let client_id = self.google_client_id()?.to_string();
        let client_secret = self
            .google_client_secret
            .clone()
            .ok_or(AppError::OAuthConfig("GOOGLE_CLIENT_SECRET"))?;
        Ok(GoogleCredentials {
            client_id,
            client_secret,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
