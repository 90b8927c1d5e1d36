//! Token authentication configuration

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Longest accepted token lifetime in seconds (ten years)
pub const MAX_TOKEN_LIFETIME: i64 = 315_360_000;

/// Lifetimes and key namespace for opaque bearer tokens
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AuthConfig {
    /// Namespace part of every token key (`{namespace}:{token}`)
    #[serde(default = "default_namespace")]
    #[validate(length(min = 1))]
    pub namespace: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_expires")]
    #[validate(range(min = 1, max = MAX_TOKEN_LIFETIME))]
    pub access_token_expires: i64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_token_expires")]
    #[validate(range(min = 1, max = MAX_TOKEN_LIFETIME))]
    pub refresh_token_expires: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            access_token_expires: default_access_token_expires(),
            refresh_token_expires: default_refresh_token_expires(),
        }
    }
}

impl AuthConfig {
    /// Set access token expiry in seconds
    pub fn with_access_expiry(mut self, seconds: i64) -> Self {
        self.access_token_expires = seconds;
        self
    }

    /// Set refresh token expiry in seconds
    pub fn with_refresh_expiry(mut self, seconds: i64) -> Self {
        self.refresh_token_expires = seconds;
        self
    }
}

fn default_namespace() -> String {
    String::from("auth")
}

fn default_access_token_expires() -> i64 {
    3600 // 1 hour
}

fn default_refresh_token_expires() -> i64 {
    2_592_000 // 30 days
}
