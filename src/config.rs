use std::net::SocketAddr;

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Process-wide settings, read once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// `APP_ENV`: "development", "production", ...
    pub environment: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let port = match var("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got {port}"))?,
            None => DEFAULT_PORT,
        };
        let max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(max) => max
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS must be a number, got {max}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            environment: var("APP_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            max_connections,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
