//! Token store connection configuration

use serde::{Deserialize, Serialize};
use validator::Validate;

/// URL scheme selecting the in-process store instead of Redis
pub const MEMORY_STORE_URL: &str = "memory://";

/// Backing store settings
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct DbConfig {
    /// Redis connection parameters
    #[validate(nested)]
    pub redis: CacheConfig,
}

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CacheConfig {
    /// Redis connection URL
    #[validate(length(min = 1, message = "redis url must not be empty"))]
    pub url: String,

    /// Optional prefix prepended to every key
    #[serde(default)]
    pub key_prefix: Option<String>,

    /// Connection attempts made at startup before giving up
    #[serde(default = "default_connect_attempts")]
    #[validate(range(min = 1))]
    pub connect_attempts: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            key_prefix: None,
            connect_attempts: default_connect_attempts(),
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Configuration for the in-process store
    pub fn memory() -> Self {
        Self::new(MEMORY_STORE_URL)
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Whether the in-process store was requested
    pub fn is_memory(&self) -> bool {
        self.url.starts_with(MEMORY_STORE_URL)
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

fn default_connect_attempts() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key() {
        let config = CacheConfig::default();
        assert_eq!(config.make_key("auth:abc"), "auth:abc");

        let config = config.with_prefix("app");
        assert_eq!(config.make_key("auth:abc"), "app:auth:abc");
    }

    #[test]
    fn test_memory_url() {
        assert!(CacheConfig::memory().is_memory());
        assert!(!CacheConfig::default().is_memory());
    }
}
