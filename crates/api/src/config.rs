//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CANTINA_DATABASE_URL` - `PostgreSQL` connection string
//! - `CANTINA_JWT_SECRET` - HS256 signing secret for access tokens (min 32 chars)
//!
//! ## Optional
//! - `CANTINA_HOST` - Bind address (default: 127.0.0.1)
//! - `CANTINA_PORT` - Listen port (default: 8080)
//! - `CANTINA_BASE_URL` - Public base URL used in pagination links
//!   (default: derived from host and port)
//! - `CANTINA_ADMIN_EMAIL` / `CANTINA_ADMIN_PASSWORD` - Seed an admin account
//!   at startup when no user exists for that email

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used to build pagination links
    pub base_url: Url,
    /// HS256 signing secret for access tokens
    pub jwt_secret: SecretString,
    /// Email for the seeded admin account
    pub admin_email: Option<String>,
    /// Password for the seeded admin account
    pub admin_password: Option<SecretString>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the JWT secret fails the length check.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = SecretString::from(require_env("CANTINA_DATABASE_URL")?);
        let host = get_env_or_default("CANTINA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CANTINA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CANTINA_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CANTINA_PORT".to_string(), e.to_string()))?;

        let base_url = get_env_or_default("CANTINA_BASE_URL", &format!("http://{host}:{port}"))
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CANTINA_BASE_URL".to_string(), e.to_string())
            })?;

        let jwt_secret = require_env("CANTINA_JWT_SECRET")?;
        validate_secret("CANTINA_JWT_SECRET", &jwt_secret)?;

        let admin_email = std::env::var("CANTINA_ADMIN_EMAIL").ok();
        let admin_password = std::env::var("CANTINA_ADMIN_PASSWORD")
            .ok()
            .map(SecretString::from);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            jwt_secret: SecretString::from(jwt_secret),
            admin_email,
            admin_password,
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Reject signing secrets too short to resist brute force.
fn validate_secret(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            name.to_string(),
            format!("must be at least {MIN_JWT_SECRET_LENGTH} characters"),
        ));
    }

    Ok(())
}
