//! Configuration module with sub-modules per concern
//!
//! - `auth` - token lifetimes and key namespace
//! - `cache` - backing store connection
//! - `server` - HTTP server and logging toggle

pub mod auth;
pub mod cache;
pub mod server;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

pub use auth::{AuthConfig, MAX_TOKEN_LIFETIME};
pub use cache::{CacheConfig, DbConfig, MEMORY_STORE_URL};
pub use server::ServerConfig;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "APP_CONFIG";

/// Configuration file used when `APP_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "./env.json";

/// Prefix of environment overrides, e.g. `APP__SERVER__HTTP_PORT`
const ENV_PREFIX: &str = "APP";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid config format! {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct AppConfig {
    /// Server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Backing store configuration
    #[validate(nested)]
    pub db: DbConfig,

    /// Token configuration
    #[serde(default)]
    #[validate(nested)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load from the file named by `APP_CONFIG` (or `./env.json`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load(&path)
    }

    /// Load, apply `APP__*` overrides and validate
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
