//! Specific error types for authentication and request validation

use serde::Serialize;
use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Access token required")]
    WrongTokenType,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Permission denied!")]
    PermissionDenied,
}

impl AuthError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::PermissionDenied => 403,
            _ => 401,
        }
    }
}

/// One schema violation reported by the body validator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaViolation {
    /// JSON pointer to the offending value
    pub instance_path: String,
    /// JSON pointer to the violated schema keyword
    pub schema_path: String,
    pub message: String,
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid request body!")]
    InvalidBody { errors: Vec<SchemaViolation> },

    #[error("Request body is not valid JSON: {reason}")]
    MalformedBody { reason: String },

    #[error("Invalid argument: {field}")]
    InvalidArgument { field: String },
}
