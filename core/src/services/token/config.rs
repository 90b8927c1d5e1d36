//! Configuration for the token authenticator

use tg_shared::config::AuthConfig;

/// Length of generated opaque tokens
pub const DEFAULT_TOKEN_LENGTH: usize = 48;

/// Configuration for the token authenticator
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Key namespace, records live at `{namespace}:{token}`
    pub namespace: String,
    /// Access token lifetime in seconds
    pub access_token_expires: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_expires: i64,
    /// Generated token length in characters
    pub token_length: usize,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for TokenServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            access_token_expires: config.access_token_expires,
            refresh_token_expires: config.refresh_token_expires,
            token_length: DEFAULT_TOKEN_LENGTH,
        }
    }
}
