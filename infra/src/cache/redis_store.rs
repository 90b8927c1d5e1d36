//! Redis token store
//!
//! Token records are Redis hashes. Each key carries the native TTL armed by
//! the authenticator, so Redis evicts records on its own. Operations are not
//! retried; a dropped connection surfaces as a store error to the caller.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use tg_core::errors::{DomainError, DomainResult};
use tg_core::repositories::TokenStore;

use crate::cache::CacheConfig;
use crate::InfrastructureError;

/// Base delay between connection attempts
const RETRY_DELAY_MS: u64 = 100;

/// Upper bound of the backoff between connection attempts
const MAX_RETRY_DELAY_MS: u64 = 5000;

/// Redis-backed [`TokenStore`]
///
/// Cloning is cheap; clones share the multiplexed connection.
#[derive(Clone)]
pub struct RedisTokenStore {
    connection: MultiplexedConnection,
    config: CacheConfig,
}

impl RedisTokenStore {
    /// Connect to the Redis server named by `config.url`
    pub async fn connect(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!("Connecting token store to Redis at {}", mask_url(&config.url));

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, config.connect_attempts, RETRY_DELAY_MS)
                .await?;

        Ok(Self { connection, config })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_attempts: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_attempts => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_attempts, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Round-trip a PING to confirm the server answers
    pub async fn health_check(&self) -> Result<(), InfrastructureError> {
        let mut conn = self.connection.clone();
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        if reply == "PONG" {
            Ok(())
        } else {
            Err(InfrastructureError::Config(format!(
                "Unexpected PING reply: {}",
                reply
            )))
        }
    }

    fn key(&self, key: &str) -> String {
        self.config.make_key(key)
    }
}

fn store_error(op: &str, key: &str, err: RedisError) -> DomainError {
    error!("Redis {} failed for key '{}': {}", op, key, err);
    DomainError::store(err)
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn hset(&self, key: &str, fields: &[(String, String)]) -> DomainResult<()> {
        let key = self.key(key);
        let mut conn = self.connection.clone();
        conn.hset_multiple::<_, _, _, ()>(&key, fields)
            .await
            .map_err(|e| store_error("HSET", &key, e))
    }

    async fn hgetall(&self, key: &str) -> DomainResult<HashMap<String, String>> {
        let key = self.key(key);
        let mut conn = self.connection.clone();
        conn.hgetall::<_, HashMap<String, String>>(&key)
            .await
            .map_err(|e| store_error("HGETALL", &key, e))
    }

    async fn expire(&self, key: &str, ttl_seconds: i64) -> DomainResult<()> {
        let key = self.key(key);
        let mut conn = self.connection.clone();
        conn.expire::<_, ()>(&key, ttl_seconds)
            .await
            .map_err(|e| store_error("EXPIRE", &key, e))
    }

    async fn delete(&self, key: &str) -> DomainResult<()> {
        let key = self.key(key);
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(&key)
            .await
            .map_err(|e| store_error("DEL", &key, e))
    }

    /// HSET and EXPIRE in one MULTI/EXEC so a record never lives without a TTL
    async fn hset_with_ttl(
        &self,
        key: &str,
        fields: &[(String, String)],
        ttl_seconds: i64,
    ) -> DomainResult<()> {
        let key = self.key(key);
        let mut conn = self.connection.clone();
        redis::pipe()
            .atomic()
            .hset_multiple(&key, fields)
            .ignore()
            .expire(&key, ttl_seconds)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| store_error("HSET+EXPIRE", &key, e))
    }

    async fn close(&self) -> DomainResult<()> {
        // The multiplexed connection closes once the last clone is dropped
        info!("Closing Redis token store at {}", mask_url(&self.config.url));
        Ok(())
    }
}

/// Hide the password portion of a Redis URL
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(scheme_end) = url.find("://") {
            let scheme = &url[..scheme_end + 3];
            let host = &url[at_pos..];
            return format!("{}****{}", scheme, host);
        }
    }
    url.to_string()
}
