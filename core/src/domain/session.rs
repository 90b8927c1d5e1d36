//! Per-request session bag.

use serde::Serialize;
use uuid::Uuid;

use super::token::TokenData;

/// Request-scoped principal information, discarded after the response
#[derive(Debug, Clone, Serialize)]
pub struct RequestSession {
    /// Principal recovered from a bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<TokenData>,
    /// Name of an internal system caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Unique id of this request
    pub nonce: Uuid,
}

impl RequestSession {
    pub fn new() -> Self {
        Self {
            user: None,
            system: None,
            nonce: Uuid::new_v4(),
        }
    }

    /// Whether any principal is attached
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() || self.system.is_some()
    }
}

impl Default for RequestSession {
    fn default() -> Self {
        Self::new()
    }
}
