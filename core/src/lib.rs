//! # Tollgate Core
//!
//! Core domain layer for the Tollgate server.
//! This crate contains token records and sessions, the error taxonomy,
//! the token store interface, and the token authenticator.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{AuthTokens, AuthUser, RequestSession, TokenData, TokenType};
pub use errors::{AuthError, DomainError, DomainResult, ValidationError};
pub use repositories::TokenStore;
pub use services::{Authenticator, TokenAuthenticator, TokenServiceConfig};
