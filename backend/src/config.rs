//! Configuration management for the Paddy Reception Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code (legacy `NEXT_PUBLIC_BACKEND_URL` and
//!    `NEXTAUTH_SECRET` variables feed these defaults)
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with PADDY_ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use crate::middleware::AuthPolicy;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";
pub const DEVELOPMENT_SECRET: &str = "development-secret-key";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Remote backend API configuration
    pub remote: RemoteConfig,

    /// Session authentication configuration
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    /// Base URL of the backend API
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Secret used to verify session tokens
    pub secret: String,

    /// What to do with requests that carry no valid session
    pub policy: AuthPolicy,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("PADDY_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let backend_url = std::env::var("NEXT_PUBLIC_BACKEND_URL")
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let secret =
            std::env::var("NEXTAUTH_SECRET").unwrap_or_else(|_| DEVELOPMENT_SECRET.to_string());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("remote.base_url", backend_url)?
            .set_default("remote.timeout_secs", 10)?
            .set_default("auth.secret", secret)?
            .set_default("auth.policy", "enforce")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PADDY_ prefix)
            .add_source(
                Environment::with_prefix("PADDY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Settings suitable for tests and local tooling
    pub fn local(base_url: &str) -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            remote: RemoteConfig {
                base_url: base_url.to_string(),
                timeout_secs: 10,
            },
            auth: AuthConfig {
                secret: DEVELOPMENT_SECRET.to_string(),
                policy: AuthPolicy::Enforce,
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
