// Application configuration
// Read from the process environment after loading `.env`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::identity::{FixtureIdentity, IdentityProvider, JwtIdentity};
use crate::domain::settings::{EnvFallbacks, ProviderId};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_JWT_SECRET: &str = "dev-secret-key";
const DEFAULT_SETTINGS_PATH: &str = "promptdeck-settings.json";
const DEFAULT_DEV_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0001);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid APP_ENV: {0} (expected development or production)")]
    InvalidEnvironment(String),

    #[error("Invalid {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("{0} must be set in production")]
    MissingInProduction(&'static str),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub settings_path: PathBuf,
    pub google_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub dev_user_id: Uuid,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let environment = match get("APP_ENV").as_deref() {
            None | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some(other) => return Err(ConfigError::InvalidEnvironment(other.to_string())),
        };

        let bind_addr = parse("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR)?;
        let database_url = get("DATABASE_URL");

        let jwt_secret = match (get("JWT_SECRET"), environment) {
            (Some(secret), _) => secret,
            (None, Environment::Production) => {
                return Err(ConfigError::MissingInProduction("JWT_SECRET"))
            }
            (None, Environment::Development) => {
                tracing::warn!("JWT_SECRET not set, using development secret");
                DEFAULT_JWT_SECRET.to_string()
            }
        };

        if environment == Environment::Production && database_url.is_none() {
            return Err(ConfigError::MissingInProduction("DATABASE_URL"));
        }

        let dev_user_id = match get("DEV_USER_ID") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "DEV_USER_ID",
                value: raw,
            })?,
            None => DEFAULT_DEV_USER_ID,
        };

        Ok(Self {
            environment,
            bind_addr,
            database_url,
            jwt_secret,
            settings_path: get("SETTINGS_PATH")
                .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string())
                .into(),
            google_api_key: get("GOOGLE_API_KEY"),
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            dev_user_id,
        })
    }

    /// JWT verification in production, the fixture user in development
    pub fn identity_provider(&self) -> Arc<dyn IdentityProvider> {
        match self.environment {
            Environment::Production => Arc::new(JwtIdentity::new(self.jwt_secret.clone())),
            Environment::Development => {
                tracing::warn!(user_id = %self.dev_user_id, "Using fixture identity for all requests");
                Arc::new(FixtureIdentity::new(self.dev_user_id))
            }
        }
    }

    pub fn env_fallbacks(&self) -> EnvFallbacks {
        let mut fallbacks = EnvFallbacks::default();
        if let Some(key) = &self.google_api_key {
            fallbacks = fallbacks.with_api_key(ProviderId::Google, key.clone());
        }
        if let Some(key) = &self.openrouter_api_key {
            fallbacks = fallbacks.with_api_key(ProviderId::OpenRouter, key.clone());
        }
        fallbacks
    }
}

fn parse<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<T, ConfigError> {
    let raw = value.unwrap_or_else(|| default.to_string());
    raw.parse()
        .map_err(|_| ConfigError::InvalidValue { name, value: raw })
}
