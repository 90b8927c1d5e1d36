//! # Infrastructure Layer
//!
//! Concrete [`TokenStore`] implementations for the gateway:
//! - **Redis**: hashes with native key expiry over a multiplexed connection
//! - **Memory**: an in-process map for development and tests, selected by a
//!   `memory://` store URL

use std::sync::Arc;

use tg_core::errors::DomainError;
use tg_core::repositories::TokenStore;
use tg_shared::config::cache::CacheConfig;

/// Cache module - token store implementations
pub mod cache;

pub use cache::{InMemoryTokenStore, RedisTokenStore};

/// Open the token store described by `config`
///
/// Redis connections are retried with backoff up to
/// `config.connect_attempts` times before giving up.
pub async fn open_store(config: &CacheConfig) -> Result<Arc<dyn TokenStore>, InfrastructureError> {
    if config.is_memory() {
        tracing::info!("Using in-process token store");
        return Ok(Arc::new(InMemoryTokenStore::new()));
    }

    let store = RedisTokenStore::connect(config.clone()).await?;
    store.health_check().await?;
    Ok(Arc::new(store))
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::store(err)
    }
}
