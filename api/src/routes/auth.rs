//! Authentication routes
//!
//! - `GET /` greeting
//! - `POST /refresh` exchange a refresh token for an access token
//! - `GET /me` the authenticated principal
//! - `POST /logout` revoke the caller's tokens

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use tg_core::errors::{AuthError, DomainError, DomainResult, ValidationError};
use tg_core::services::Authenticator;

use crate::middleware::auth::{extract_bearer_token, RequireAuth};
use crate::router::{bind, ArgExtractor, Endpoint, RouteGroup};

#[derive(Debug, Serialize)]
struct AccessTokenResponse {
    access_token: String,
    expires_in: i64,
    token_type: &'static str,
}

#[derive(Debug, Serialize)]
struct PrincipalResponse {
    id: Value,
    scope: Value,
}

fn refresh_schema() -> Value {
    json!({
        "type": "object",
        "required": ["refresh_token"],
        "properties": {
            "refresh_token": { "type": "string", "minLength": 1 }
        }
    })
}

fn logout_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "refresh_token": { "type": "string" }
        }
    })
}

fn to_json(value: impl Serialize) -> DomainResult<Value> {
    serde_json::to_value(value).map_err(|e| DomainError::Internal {
        message: format!("Failed to serialize response: {}", e),
    })
}

/// Token exchange and session endpoints
pub struct AuthRouter {
    authenticator: Arc<dyn Authenticator>,
}

impl AuthRouter {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator }
    }

    async fn hello_world(self: Arc<Self>, _args: Vec<Value>) -> DomainResult<Value> {
        Ok(json!({ "Hello": "world" }))
    }

    /// Args: `refresh_token`
    async fn refresh(self: Arc<Self>, args: Vec<Value>) -> DomainResult<Value> {
        let refresh_token = args
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| ValidationError::InvalidArgument {
                field: "refresh_token".to_string(),
            })?;

        let access_token = self
            .authenticator
            .gen_access_token(refresh_token)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        to_json(AccessTokenResponse {
            access_token,
            expires_in: self.authenticator.access_token_expires(),
            token_type: "bearer",
        })
    }

    /// Args: `session.user.id`, `session.user.scope`
    async fn me(self: Arc<Self>, args: Vec<Value>) -> DomainResult<Value> {
        let mut args = args.into_iter();
        let id = args.next().unwrap_or(Value::Null);
        let scope = args.next().unwrap_or(Value::Null);
        if id.is_null() {
            return Err(AuthError::Unauthenticated.into());
        }

        to_json(PrincipalResponse { id, scope })
    }

    /// Args: bearer token, `body.refresh_token`, `session.user.id`
    ///
    /// The refresh token is revoked only when it belongs to the caller.
    async fn logout(self: Arc<Self>, args: Vec<Value>) -> DomainResult<Value> {
        let mut args = args.into_iter();
        let access_token = args.next().unwrap_or(Value::Null);
        let refresh_token = args.next().unwrap_or(Value::Null);
        let user_id = args.next().and_then(|v| v.as_i64());

        let access_token = access_token.as_str().ok_or(AuthError::MissingToken)?;
        self.authenticator.revoke_token(access_token).await?;

        if let Some(refresh_token) = refresh_token.as_str().filter(|t| !t.is_empty()) {
            match self.authenticator.parse_token(refresh_token).await {
                Ok(data) if Some(data.id) == user_id => {
                    self.authenticator.revoke_token(refresh_token).await?;
                }
                Ok(_) => log::warn!("Logout ignored a refresh token of another principal"),
                Err(DomainError::Auth(_)) => {}
                Err(err) => return Err(err),
            }
        }

        Ok(json!({ "message": "Logged out" }))
    }
}

impl RouteGroup for AuthRouter {
    fn name(&self) -> &'static str {
        "AuthRouter"
    }

    fn endpoints(self: Arc<Self>) -> DomainResult<Vec<Endpoint>> {
        let require_auth = RequireAuth::new(Arc::clone(&self.authenticator));

        Ok(vec![
            Endpoint::get("hello_world", bind(&self, Self::hello_world)).path("/"),
            Endpoint::post("refresh", bind(&self, Self::refresh))
                .valid_body(&refresh_schema())?
                .body_args(&["refresh_token"])?,
            Endpoint::get("me", bind(&self, Self::me))
                .middleware(require_auth.clone().renewing())
                .args([
                    ArgExtractor::field("session.user.id")?,
                    ArgExtractor::field("session.user.scope")?,
                ]),
            Endpoint::post("logout", bind(&self, Self::logout))
                .middleware(require_auth)
                .valid_body(&logout_schema())?
                .args([
                    ArgExtractor::computed(|ctx| {
                        extract_bearer_token(ctx).map_or(Value::Null, Value::String)
                    }),
                    ArgExtractor::body("refresh_token")?,
                    ArgExtractor::field("session.user.id")?,
                ]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tg_core::services::{TokenAuthenticator, TokenServiceConfig};
    use tg_infra::InMemoryTokenStore;

    fn router() -> Arc<AuthRouter> {
        let authenticator = TokenAuthenticator::new(
            Arc::new(InMemoryTokenStore::new()),
            TokenServiceConfig::default(),
        );
        Arc::new(AuthRouter::new(Arc::new(authenticator)))
    }

    #[test]
    fn test_endpoint_table() {
        let endpoints = router().endpoints().unwrap();
        let table: Vec<(String, &str)> = endpoints
            .iter()
            .map(|e| (e.method().to_string(), e.path_pattern()))
            .collect();

        assert_eq!(
            table,
            vec![
                ("GET".to_string(), "/"),
                ("POST".to_string(), "/refresh"),
                ("GET".to_string(), "/me"),
                ("POST".to_string(), "/logout"),
            ]
        );
    }

    #[actix_web::test]
    async fn test_refresh_rejects_unknown_token() {
        let err = router()
            .refresh(vec![json!("not-a-token")])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::InvalidRefreshToken)));
        assert_eq!(err.to_string(), "Invalid refresh token");
        assert_eq!(err.status_code(), 401);
    }

    #[actix_web::test]
    async fn test_me_without_principal() {
        let err = router().me(vec![Value::Null, Value::Null]).await.unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::Unauthenticated)));
    }
}
