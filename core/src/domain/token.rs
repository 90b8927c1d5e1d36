//! Token record and issued token pair.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Hash field names of a stored token record
pub mod fields {
    pub const ID: &str = "id";
    pub const SCOPE: &str = "scope";
    pub const TYPE: &str = "type";
    pub const EXPIRED: &str = "expired";
}

/// Token kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenType {
    Refresh,
    Access,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Refresh => "REFRESH",
            TokenType::Access => "ACCESS",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REFRESH" => Ok(TokenType::Refresh),
            "ACCESS" => Ok(TokenType::Access),
            _ => Err(()),
        }
    }
}

/// The principal a token is issued for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub scope: String,
}

impl AuthUser {
    pub fn new(id: i64, scope: impl Into<String>) -> Self {
        Self {
            id,
            scope: scope.into(),
        }
    }
}

/// A stored token record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub id: i64,
    pub scope: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Absolute expiry in milliseconds since epoch
    pub expired: i64,
}

impl TokenData {
    pub fn new(user: &AuthUser, token_type: TokenType, expired: i64) -> Self {
        Self {
            id: user.id,
            scope: user.scope.clone(),
            token_type,
            expired,
        }
    }

    /// Principal this record belongs to
    pub fn user(&self) -> AuthUser {
        AuthUser::new(self.id, self.scope.clone())
    }

    /// Valid up to and including the `expired` millisecond
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expired < now_ms
    }

    /// Encode as hash fields for the store
    pub fn to_fields(&self) -> Vec<(String, String)> {
        vec![
            (fields::ID.to_string(), self.id.to_string()),
            (fields::SCOPE.to_string(), self.scope.clone()),
            (fields::TYPE.to_string(), self.token_type.as_str().to_string()),
            (fields::EXPIRED.to_string(), self.expired.to_string()),
        ]
    }

    /// Decode hash fields read from the store
    ///
    /// Returns `None` for an empty mapping (absent key) or a record with a
    /// missing or malformed field.
    pub fn from_fields(map: &HashMap<String, String>) -> Option<Self> {
        Some(Self {
            id: map.get(fields::ID)?.parse().ok()?,
            scope: map.get(fields::SCOPE)?.clone(),
            token_type: map.get(fields::TYPE)?.parse().ok()?,
            expired: map.get(fields::EXPIRED)?.parse().ok()?,
        })
    }
}

/// Token pair handed to a client after authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub refresh_token: String,
    pub token_type: String,
}
