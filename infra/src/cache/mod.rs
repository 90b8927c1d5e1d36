//! Cache module for token record storage
//!
//! Both stores keep each token as a hash of string fields with a per-key TTL.

pub mod memory_store;
pub mod redis_store;

#[cfg(test)]
mod tests;

pub use memory_store::InMemoryTokenStore;
pub use redis_store::RedisTokenStore;

// Re-export commonly used types
pub use tg_shared::config::cache::CacheConfig;
