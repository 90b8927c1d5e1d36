//! Opaque bearer token issuance, renewal, revocation and parsing

use std::sync::Arc;

use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use tracing::{debug, info};

use crate::domain::token::{fields, AuthTokens, AuthUser, TokenData, TokenType};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::TokenStore;

use super::config::TokenServiceConfig;

/// Token authenticator contract, object safe for injection into middleware
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Access token lifetime in seconds
    fn access_token_expires(&self) -> i64;

    /// Refresh token lifetime in seconds
    fn refresh_token_expires(&self) -> i64;

    /// Issue a refresh token and an access token derived from it
    async fn gen_tokens(&self, user: &AuthUser) -> DomainResult<AuthTokens>;

    async fn gen_refresh_token(&self, user: &AuthUser) -> DomainResult<String>;

    /// Mint an access token from a refresh token
    ///
    /// `Ok(None)` means the refresh token is unknown, expired or not a
    /// refresh token.
    async fn gen_access_token(&self, refresh_token: &str) -> DomainResult<Option<String>>;

    /// Slide the expiry of a valid access token; does nothing otherwise
    async fn renew_token(&self, access_token: &str) -> DomainResult<()>;

    async fn revoke_token(&self, token: &str) -> DomainResult<()>;

    /// Recover the record behind a token, failing with `AuthError::InvalidToken`
    async fn parse_token(&self, token: &str) -> DomainResult<TokenData>;
}

/// Authenticator backed by a [`TokenStore`]
///
/// Validity is checked twice: the store's TTL evicts records, and the
/// embedded `expired` field is compared on every read because eviction can
/// lag behind the clock. TTLs are armed one second past the embedded expiry
/// so eviction never precedes it.
pub struct TokenAuthenticator {
    store: Arc<dyn TokenStore>,
    config: TokenServiceConfig,
}

impl TokenAuthenticator {
    pub fn new(store: Arc<dyn TokenStore>, config: TokenServiceConfig) -> Self {
        Self { store, config }
    }

    /// Store key of a token record
    pub fn key(&self, token: &str) -> String {
        format!("{}:{}", self.config.namespace, token)
    }

    fn generate_token(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.config.token_length)
            .map(char::from)
            .collect()
    }

    async fn read(&self, token: &str) -> DomainResult<Option<TokenData>> {
        let map = self.store.hgetall(&self.key(token)).await?;
        Ok(TokenData::from_fields(&map))
    }

    /// Write a fresh record and arm its TTL
    async fn issue(&self, user: &AuthUser, token_type: TokenType, lifetime: i64) -> DomainResult<String> {
        let token = self.generate_token();
        let data = TokenData::new(user, token_type, now_ms().saturating_add(lifetime.saturating_mul(1000)));

        self.store
            .hset_with_ttl(&self.key(&token), &data.to_fields(), lifetime.saturating_add(1))
            .await?;

        debug!(
            "Issued {} token {} for principal {}",
            token_type,
            mask_token(&token),
            user.id
        );
        Ok(token)
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    fn access_token_expires(&self) -> i64 {
        self.config.access_token_expires
    }

    fn refresh_token_expires(&self) -> i64 {
        self.config.refresh_token_expires
    }

    async fn gen_tokens(&self, user: &AuthUser) -> DomainResult<AuthTokens> {
        let refresh_token = self.gen_refresh_token(user).await?;
        let access_token = self
            .gen_access_token(&refresh_token)
            .await?
            .ok_or_else(|| DomainError::Internal {
                message: "refresh token vanished before access token was derived".to_string(),
            })?;

        info!("Generated token pair for principal {}", user.id);

        Ok(AuthTokens {
            access_token,
            expires_in: self.config.access_token_expires,
            refresh_token,
            token_type: "bearer".to_string(),
        })
    }

    async fn gen_refresh_token(&self, user: &AuthUser) -> DomainResult<String> {
        self.issue(user, TokenType::Refresh, self.config.refresh_token_expires)
            .await
    }

    async fn gen_access_token(&self, refresh_token: &str) -> DomainResult<Option<String>> {
        let data = match self.read(refresh_token).await? {
            Some(data) if data.token_type == TokenType::Refresh && !data.is_expired_at(now_ms()) => data,
            _ => {
                debug!("Rejected refresh token {}", mask_token(refresh_token));
                return Ok(None);
            }
        };

        let token = self
            .issue(&data.user(), TokenType::Access, self.config.access_token_expires)
            .await?;
        Ok(Some(token))
    }

    async fn renew_token(&self, access_token: &str) -> DomainResult<()> {
        match self.read(access_token).await? {
            Some(data) if data.token_type == TokenType::Access && !data.is_expired_at(now_ms()) => {
                let expired = now_ms().saturating_add(self.config.access_token_expires.saturating_mul(1000));
                self.store
                    .hset_with_ttl(
                        &self.key(access_token),
                        &[(fields::EXPIRED.to_string(), expired.to_string())],
                        self.config.access_token_expires.saturating_add(1),
                    )
                    .await?;
                debug!("Renewed access token {}", mask_token(access_token));
            }
            _ => debug!("Skipped renewal of token {}", mask_token(access_token)),
        }

        Ok(())
    }

    async fn revoke_token(&self, token: &str) -> DomainResult<()> {
        self.store.delete(&self.key(token)).await?;
        info!("Revoked token {}", mask_token(token));
        Ok(())
    }

    async fn parse_token(&self, token: &str) -> DomainResult<TokenData> {
        match self.read(token).await? {
            Some(data) if !data.is_expired_at(now_ms()) => Ok(data),
            _ => Err(AuthError::InvalidToken.into()),
        }
    }
}

/// Current time in milliseconds since epoch
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// First characters of a token, for logs
fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(6).collect();
    format!("{}****", visible)
}
