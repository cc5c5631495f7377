//! Application settings loaded from `config.toml` and the environment.
//!
//! The file carries non-secret settings only. The token signing secret is read from
//! `AUTH_SECRET_KEY` and `DATABASE_URL` overrides the configured store.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable holding the token signing secret
pub const SECRET_KEY_VAR: &str = "AUTH_SECRET_KEY";

/// Whole-application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Relational store settings
    #[serde(default)]
    pub database: DatabaseSettings,
    /// Token issuance settings
    pub auth: AuthSettings,
}

/// Relational store settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Connection URL understood by `SeaORM`
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

/// Settings for signing and validating access tokens
#[derive(Clone, Deserialize)]
pub struct AuthSettings {
    /// `iss` claim written into, and required on, every token
    pub issuer: String,
    /// `aud` claim written into, and required on, every token
    pub audience: String,
    /// HMAC signing secret, populated from [`SECRET_KEY_VAR`]
    #[serde(skip)]
    pub secret_key: String,
}

// Keeps the secret out of logs.
impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

/// Parses configuration from TOML text without consulting the environment.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from `path`, then applies `DATABASE_URL` and the signing secret
/// from the environment.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read or is not valid TOML
/// - `AUTH_SECRET_KEY` is unset or empty
pub fn load_app_configuration<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    let mut config = parse_config(&contents)?;

    if let Ok(url) = std::env::var("DATABASE_URL") {
        debug!("DATABASE_URL overrides configured database");
        config.database.url = url;
    }

    config.auth.secret_key = std::env::var(SECRET_KEY_VAR).unwrap_or_default();
    if config.auth.secret_key.trim().is_empty() {
        return Err(Error::Config {
            message: format!("{SECRET_KEY_VAR} must be set to a non-empty value"),
        });
    }

    info!("Loaded configuration from {}", path_ref.display());
    Ok(config)
}
