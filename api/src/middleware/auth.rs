//! Bearer token authentication for endpoints
//!
//! Reads `Authorization: Bearer <token>`, resolves the token through the
//! [`Authenticator`] and attaches the record to `session.user`.

use std::sync::Arc;

use async_trait::async_trait;

use tg_core::domain::TokenType;
use tg_core::errors::{AuthError, DomainResult};
use tg_core::services::Authenticator;

use crate::router::{Middleware, RequestContext};

/// Requires a valid access token on the request
#[derive(Clone)]
pub struct RequireAuth {
    authenticator: Arc<dyn Authenticator>,
    renew: bool,
    scope: Option<String>,
}

impl RequireAuth {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            renew: false,
            scope: None,
        }
    }

    /// Slide the token's expiry forward on every authenticated request
    pub fn renewing(mut self) -> Self {
        self.renew = true;
        self
    }

    /// Only admit tokens issued for `scope`
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

#[async_trait(?Send)]
impl Middleware for RequireAuth {
    async fn handle(&self, ctx: &mut RequestContext) -> DomainResult<()> {
        let token = extract_bearer_token(ctx).ok_or(AuthError::MissingToken)?;

        let data = self.authenticator.parse_token(&token).await?;
        if data.token_type != TokenType::Access {
            return Err(AuthError::WrongTokenType.into());
        }

        if let Some(scope) = &self.scope {
            if &data.scope != scope {
                log::debug!("Token scope '{}' does not grant '{}'", data.scope, scope);
                return Err(AuthError::PermissionDenied.into());
            }
        }

        if self.renew {
            self.authenticator.renew_token(&token).await?;
        }

        ctx.session.user = Some(data);
        Ok(())
    }
}

/// Extracts Bearer token from Authorization header
pub fn extract_bearer_token(ctx: &RequestContext) -> Option<String> {
    ctx.header("authorization")?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::Method;
    use tg_core::domain::AuthUser;
    use tg_core::errors::DomainError;
    use tg_core::services::{TokenAuthenticator, TokenServiceConfig};
    use tg_infra::InMemoryTokenStore;

    fn authenticator() -> Arc<dyn Authenticator> {
        Arc::new(TokenAuthenticator::new(
            Arc::new(InMemoryTokenStore::new()),
            TokenServiceConfig::default(),
        ))
    }

    fn request(token: Option<&str>) -> RequestContext {
        let ctx = RequestContext::new(Method::GET, "/me");
        match token {
            Some(token) => ctx.with_header("Authorization", &format!("Bearer {}", token)),
            None => ctx,
        }
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&request(Some("abc"))), Some("abc".to_string()));
        assert_eq!(extract_bearer_token(&request(None)), None);

        let basic = RequestContext::new(Method::GET, "/").with_header("Authorization", "Basic abc");
        assert_eq!(extract_bearer_token(&basic), None);

        let empty = RequestContext::new(Method::GET, "/").with_header("Authorization", "Bearer  ");
        assert_eq!(extract_bearer_token(&empty), None);
    }

    #[actix_web::test]
    async fn test_missing_token() {
        let auth = RequireAuth::new(authenticator());
        let err = auth.handle(&mut request(None)).await.unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::MissingToken)));
        assert_eq!(err.status_code(), 401);
    }

    #[actix_web::test]
    async fn test_invalid_token() {
        let auth = RequireAuth::new(authenticator());
        let err = auth.handle(&mut request(Some("nope"))).await.unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::InvalidToken)));
    }

    #[actix_web::test]
    async fn test_access_token_sets_session_user() {
        let authenticator = authenticator();
        let tokens = authenticator.gen_tokens(&AuthUser::new(3, "admin")).await.unwrap();

        let auth = RequireAuth::new(Arc::clone(&authenticator)).renewing();
        let mut ctx = request(Some(&tokens.access_token));
        auth.handle(&mut ctx).await.unwrap();

        let user = ctx.session.user.unwrap();
        assert_eq!(user.id, 3);
        assert_eq!(user.scope, "admin");
    }

    #[actix_web::test]
    async fn test_refresh_token_rejected() {
        let authenticator = authenticator();
        let tokens = authenticator.gen_tokens(&AuthUser::new(3, "admin")).await.unwrap();

        let auth = RequireAuth::new(authenticator);
        let mut ctx = request(Some(&tokens.refresh_token));
        let err = auth.handle(&mut ctx).await.unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::WrongTokenType)));
        assert_eq!(err.status_code(), 401);
        assert!(ctx.session.user.is_none());
    }

    #[actix_web::test]
    async fn test_scope_mismatch_forbidden() {
        let authenticator = authenticator();
        let tokens = authenticator.gen_tokens(&AuthUser::new(3, "user")).await.unwrap();

        let auth = RequireAuth::new(authenticator).with_scope("admin");
        let err = auth
            .handle(&mut request(Some(&tokens.access_token)))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
