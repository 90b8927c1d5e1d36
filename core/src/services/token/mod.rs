//! Token service module for opaque bearer tokens
//!
//! This module handles all token-related operations:
//! - Refresh/access token pair issuance
//! - Access token renewal (sliding expiry)
//! - Token revocation
//! - Token parsing and validation

mod config;
mod service;


pub use config::{TokenServiceConfig, DEFAULT_TOKEN_LENGTH};
pub use service::{Authenticator, TokenAuthenticator};
