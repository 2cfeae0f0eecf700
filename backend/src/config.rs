//! Configuration management for the crowd insights server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CROWD_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Statistics/ML backend configuration
    pub backend: BackendConfig,

    /// Forecast configuration
    pub forecast: ForecastConfig,

    /// Dashboard controller configuration
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Base URL of the statistics and inference service
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// District used when the scope is unscoped and no district list is known
    pub fallback_district: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Capacity of the controller command channel
    pub command_buffer: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CROWD_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("backend.base_url", "http://localhost:5000")?
            .set_default("backend.timeout_secs", 30)?
            .set_default("forecast.fallback_district", "Visakhapatnam")?
            .set_default("dashboard.command_buffer", 32)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CROWD_ prefix)
            .add_source(
                Environment::with_prefix("CROWD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
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

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            fallback_district: "Visakhapatnam".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { command_buffer: 32 }
    }
}
