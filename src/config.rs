//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and passed to components through `AppState`.

use std::env;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite://lifehub.db?mode=rwc";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// SQLx connection URL for the relational store
    pub database_url: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Lifetime of issued access tokens
    pub access_token_expire_minutes: i64,
    /// Model used for meal analysis
    pub gemini_model: String,
    /// Upper bound on one call to the generative-text service
    pub ai_timeout: Duration,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Generative-text service API key
    pub gemini_api_key: String,
}

impl Config {
    /// Config for tests: in-memory database, fixed keys.
    pub fn test_default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8000,
            access_token_expire_minutes: 30,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            ai_timeout: Duration::from_secs(5),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            gemini_api_key: "test_gemini_key".to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: parse_var("PORT", 8000)?,
            access_token_expire_minutes: parse_var("ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            ai_timeout: Duration::from_secs(parse_var("AI_TIMEOUT_SECS", 30)?),

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GEMINI_API_KEY"))?,
        })
    }
}

/// Read an optional variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("GEMINI_API_KEY", " test_gemini \n");
        env::set_var("AI_TIMEOUT_SECS", "12");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.gemini_api_key, "test_gemini");
        assert_eq!(config.ai_timeout, Duration::from_secs(12));
        assert_eq!(config.access_token_expire_minutes, 30);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("LIFEHUB_TEST_PORT", "eighty");
        let err = parse_var::<u16>("LIFEHUB_TEST_PORT", 1).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("LIFEHUB_TEST_PORT", _)));
    }
}
