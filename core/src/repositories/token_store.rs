//! Key-value store interface backing token records.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Hash-of-fields store with native per-key expiry
///
/// Implementations map transport failures to
/// [`DomainError::StoreUnavailable`](crate::errors::DomainError::StoreUnavailable)
/// and never retry. Writes to one key are last-writer-wins.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Set hash fields on `key`, creating it if absent
    async fn hset(&self, key: &str, fields: &[(String, String)]) -> DomainResult<()>;

    /// All fields of `key`; an empty map when the key does not exist
    async fn hgetall(&self, key: &str) -> DomainResult<HashMap<String, String>>;

    /// Arm the native TTL of `key`
    async fn expire(&self, key: &str, ttl_seconds: i64) -> DomainResult<()>;

    /// Remove `key`; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> DomainResult<()>;

    /// Set fields and arm the TTL together
    ///
    /// The default issues two calls. Stores with transactions override it.
    async fn hset_with_ttl(
        &self,
        key: &str,
        fields: &[(String, String)],
        ttl_seconds: i64,
    ) -> DomainResult<()> {
        self.hset(key, fields).await?;
        self.expire(key, ttl_seconds).await
    }

    /// Release connections at shutdown
    async fn close(&self) -> DomainResult<()> {
        Ok(())
    }
}
