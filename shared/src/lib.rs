//! Shared utilities and common types for the Tollgate server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and loading
//! - Error response structures

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, AuthConfig, CacheConfig, ConfigError, DbConfig, ServerConfig};
pub use types::ErrorResponse;
