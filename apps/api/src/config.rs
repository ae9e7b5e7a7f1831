//! API server configuration

use std::env;

use anyhow::{bail, Context, Result};
use eventhub_shared_config::{CommonConfig, DatabaseConfig, Environment};

/// Minimum required length for JWT_SECRET to be considered secure
const MIN_JWT_SECRET_LENGTH: usize = 32;

const DEFAULT_PORT: u16 = 4000;

const DEVELOPMENT_JWT_SECRET: &str = "development-secret-change-in-production";

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other services
    pub common: CommonConfig,

    /// Server port (default: 4000)
    pub port: u16,

    /// JWT signing secret
    pub jwt_secret: String,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production `JWT_SECRET` must be at least 32 characters and
    /// `DATABASE_URL` must be set. Elsewhere insecure defaults are used with a
    /// warning.
    pub fn from_env() -> Result<Self> {
        let common = CommonConfig::from_env().context("Failed to load config")?;
        let jwt_secret = Self::load_jwt_secret(common.environment.is_production())?;

        let port = match env::var("PORT") {
            Ok(raw) if !raw.trim().is_empty() => {
                raw.trim().parse().context("Invalid PORT value")?
            }
            _ => DEFAULT_PORT,
        };

        Ok(Self {
            common,
            port,
            jwt_secret,
            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        })
    }

    fn load_jwt_secret(is_production: bool) -> Result<String> {
        match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => {
                if is_production && secret.len() < MIN_JWT_SECRET_LENGTH {
                    bail!(
                        "JWT_SECRET must be at least {} characters in production (got {})",
                        MIN_JWT_SECRET_LENGTH,
                        secret.len()
                    );
                }
                Ok(secret)
            }
            _ if is_production => {
                bail!(
                    "JWT_SECRET environment variable is required in production. \
                     Please set a secure secret of at least {} characters.",
                    MIN_JWT_SECRET_LENGTH
                );
            }
            _ => {
                tracing::warn!(
                    "JWT_SECRET not set, using insecure default. \
                     This is only acceptable in development mode."
                );
                Ok(DEVELOPMENT_JWT_SECRET.to_string())
            }
        }
    }

    /// Database configuration, if a database is configured
    pub fn database(&self) -> Option<&DatabaseConfig> {
        self.common.database.as_ref()
    }

    pub fn environment(&self) -> Environment {
        self.common.environment
    }

    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}
