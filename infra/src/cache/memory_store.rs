//! In-process token store
//!
//! Expiry is enforced lazily: an expired key is dropped the next time it is
//! touched. Time is read from [`tokio::time::Instant`] so paused-clock tests
//! can advance past a TTL.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;

use tg_core::errors::{DomainError, DomainResult};
use tg_core::repositories::TokenStore;

struct Entry {
    fields: HashMap<String, String>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Map-backed [`TokenStore`] for single-process deployments and tests
#[derive(Default)]
pub struct InMemoryTokenStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|e| e.is_live(now)).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lock the map and evict `key` if its TTL has elapsed
    fn live(&self, key: &str) -> DomainResult<MutexGuard<'_, HashMap<String, Entry>>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| DomainError::store("in-memory token store lock poisoned"))?;

        let now = Instant::now();
        if entries.get(key).is_some_and(|e| !e.is_live(now)) {
            debug!("Evicting expired key '{}'", key);
            entries.remove(key);
        }
        Ok(entries)
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn hset(&self, key: &str, fields: &[(String, String)]) -> DomainResult<()> {
        let mut entries = self.live(key)?;
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            fields: HashMap::new(),
            expires_at: None,
        });
        for (field, value) in fields {
            entry.fields.insert(field.clone(), value.clone());
        }
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> DomainResult<HashMap<String, String>> {
        let entries = self.live(key)?;
        Ok(entries
            .get(key)
            .map(|e| e.fields.clone())
            .unwrap_or_default())
    }

    async fn expire(&self, key: &str, ttl_seconds: i64) -> DomainResult<()> {
        let mut entries = self.live(key)?;
        if ttl_seconds <= 0 {
            // Non-positive TTLs delete the key, as in Redis
            entries.remove(key);
        } else if let Some(entry) = entries.get_mut(key) {
            // TTLs past the clock range never expire
            entry.expires_at = Instant::now().checked_add(Duration::from_secs(ttl_seconds as u64));
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> DomainResult<()> {
        self.live(key)?.remove(key);
        Ok(())
    }
}
