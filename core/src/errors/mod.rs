//! Domain error taxonomy and its HTTP status mapping.

mod types;

pub use types::{AuthError, SchemaViolation, ValidationError};

use serde_json::Value;
use thiserror::Error;

/// Core domain errors
///
/// Every handler and middleware failure is one of these. The dispatcher is
/// the only place that turns them into HTTP responses.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Cannot {method} {path}! API not found")]
    NotFound { method: String, path: String },

    #[error("Token store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// Handler-raised failure carrying its own status
    #[error("{message}")]
    Logic {
        message: String,
        status: Option<u16>,
        details: Option<Value>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Control signal: this route declines the request, try the next one.
    #[error("Route passed")]
    PassThrough,
}

impl DomainError {
    /// Application logic error with an explicit status code
    pub fn logic(message: impl Into<String>, status: u16) -> Self {
        DomainError::Logic {
            message: message.into(),
            status: Some(status),
            details: None,
        }
    }

    pub fn store(err: impl std::fmt::Display) -> Self {
        DomainError::StoreUnavailable {
            message: err.to_string(),
        }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, DomainError::PassThrough)
    }

    /// HTTP status code, 500 when the error does not specify one
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::Validation(_) => 400,
            DomainError::Auth(err) => err.status_code(),
            DomainError::NotFound { .. } | DomainError::PassThrough => 404,
            DomainError::Logic { status, .. } => status.unwrap_or(500),
            DomainError::StoreUnavailable { .. } | DomainError::Internal { .. } => 500,
        }
    }

    /// Structured details for the response body
    pub fn details(&self) -> Option<Value> {
        match self {
            DomainError::Validation(ValidationError::InvalidBody { errors }) => {
                serde_json::to_value(errors).ok()
            }
            DomainError::Logic { details, .. } => details.clone(),
            _ => None,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
