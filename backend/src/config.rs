//! Runtime configuration read from the environment.

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:aviary.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// `None` allows any origin
    pub cors_origin: Option<HeaderValue>,
}

impl AppConfig {
    /// Reads `AVIARY_DATABASE_URL`, `AVIARY_BIND_ADDR` and `AVIARY_CORS_ORIGIN`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url =
            lookup("AVIARY_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = lookup("AVIARY_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("AVIARY_BIND_ADDR is not a socket address: {}", bind_addr))?;

        let cors_origin = lookup("AVIARY_CORS_ORIGIN")
            .filter(|origin| !origin.trim().is_empty())
            .map(|origin| {
                origin
                    .trim()
                    .parse::<HeaderValue>()
                    .with_context(|| format!("AVIARY_CORS_ORIGIN is not a valid origin: {}", origin))
            })
            .transpose()?;

        Ok(Self {
            database_url,
            bind_addr,
            cors_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = config_from(&[
            ("AVIARY_DATABASE_URL", "sqlite::memory:"),
            ("AVIARY_BIND_ADDR", "0.0.0.0:8080"),
            ("AVIARY_CORS_ORIGIN", "http://localhost:5173"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.cors_origin.unwrap(), "http://localhost:5173");

        assert!(config_from(&[("AVIARY_BIND_ADDR", "localhost")]).is_err());
    }
}
