//! End-to-end tests of the authentication routes over the in-memory store

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web};
use serde_json::{json, Value};

use tg_api::app::{build_dispatcher, create_app};
use tg_api::router::{Dispatcher, LogErrorReporter};
use tg_core::domain::{AuthTokens, AuthUser};
use tg_core::repositories::TokenStore;
use tg_core::services::{Authenticator, TokenAuthenticator, TokenServiceConfig};
use tg_infra::InMemoryTokenStore;

struct TestContext {
    store: Arc<InMemoryTokenStore>,
    authenticator: Arc<dyn Authenticator>,
    dispatcher: web::Data<Dispatcher>,
}

fn setup() -> TestContext {
    let store = Arc::new(InMemoryTokenStore::new());
    let authenticator: Arc<dyn Authenticator> = Arc::new(TokenAuthenticator::new(
        store.clone(),
        TokenServiceConfig::default(),
    ));
    let dispatcher = build_dispatcher(
        Arc::clone(&authenticator),
        Arc::new(LogErrorReporter::new("auth-routes-test")),
        false,
    )
    .unwrap();

    TestContext {
        store,
        authenticator,
        dispatcher: web::Data::new(dispatcher),
    }
}

async fn login(ctx: &TestContext) -> AuthTokens {
    ctx.authenticator
        .gen_tokens(&AuthUser::new(42, "admin"))
        .await
        .unwrap()
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn test_hello_world() {
    let ctx = setup();
    let app = test::init_service(create_app(ctx.dispatcher.clone(), false)).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "Hello": "world" }));
}

#[actix_web::test]
async fn test_unknown_route() {
    let ctx = setup();
    let app = test::init_service(create_app(ctx.dispatcher.clone(), false)).await;

    let req = test::TestRequest::post().uri("/unknown").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "status": 404, "message": "Cannot POST /unknown! API not found" })
    );
}

#[actix_web::test]
async fn test_refresh_issues_access_token() {
    let ctx = setup();
    let app = test::init_service(create_app(ctx.dispatcher.clone(), false)).await;
    let tokens = login(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/refresh")
        .set_json(json!({ "refresh_token": tokens.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["expires_in"], 3600);

    let access_token = body["access_token"].as_str().unwrap();
    assert_ne!(access_token, tokens.access_token);
    let data = ctx.authenticator.parse_token(access_token).await.unwrap();
    assert_eq!(data.id, 42);
}

#[actix_web::test]
async fn test_refresh_rejects_invalid_token() {
    let ctx = setup();
    let app = test::init_service(create_app(ctx.dispatcher.clone(), false)).await;
    let tokens = login(&ctx).await;

    for token in ["never-issued", tokens.access_token.as_str()] {
        let req = test::TestRequest::post()
            .uri("/refresh")
            .set_json(json!({ "refresh_token": token }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid refresh token");
    }
}

#[actix_web::test]
async fn test_refresh_requires_body() {
    let ctx = setup();
    let app = test::init_service(create_app(ctx.dispatcher.clone(), false)).await;

    let req = test::TestRequest::post().uri("/refresh").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid request body!");
}

#[actix_web::test]
async fn test_me_requires_access_token() {
    let ctx = setup();
    let app = test::init_service(create_app(ctx.dispatcher.clone(), false)).await;
    let tokens = login(&ctx).await;

    let req = test::TestRequest::get().uri("/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Missing bearer token");

    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(bearer("garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid token");

    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(bearer(&tokens.refresh_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_me_returns_principal_and_renews() {
    let ctx = setup();
    let app = test::init_service(create_app(ctx.dispatcher.clone(), false)).await;
    let tokens = login(&ctx).await;

    // Pull the expiry close so the renewal is observable
    let soon = chrono::Utc::now().timestamp_millis() + 5_000;
    ctx.store
        .hset(
            &format!("auth:{}", tokens.access_token),
            &[("expired".to_string(), soon.to_string())],
        )
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(bearer(&tokens.access_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "id": 42, "scope": "admin" }));

    let data = ctx.authenticator.parse_token(&tokens.access_token).await.unwrap();
    assert!(data.expired > soon + 3_000_000);
}

#[actix_web::test]
async fn test_logout_revokes_tokens() {
    let ctx = setup();
    let app = test::init_service(create_app(ctx.dispatcher.clone(), false)).await;
    let tokens = login(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/logout")
        .insert_header(bearer(&tokens.access_token))
        .set_json(json!({ "refresh_token": tokens.refresh_token }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "message": "Logged out" }));

    assert!(ctx.authenticator.parse_token(&tokens.access_token).await.is_err());
    assert!(ctx.authenticator.parse_token(&tokens.refresh_token).await.is_err());

    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(bearer(&tokens.access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_keeps_foreign_refresh_token() {
    let ctx = setup();
    let app = test::init_service(create_app(ctx.dispatcher.clone(), false)).await;
    let mine = login(&ctx).await;
    let theirs = ctx
        .authenticator
        .gen_tokens(&AuthUser::new(7, "user"))
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/logout")
        .insert_header(bearer(&mine.access_token))
        .set_json(json!({ "refresh_token": theirs.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert!(ctx.authenticator.parse_token(&mine.access_token).await.is_err());
    assert!(ctx.authenticator.parse_token(&theirs.refresh_token).await.is_ok());
}

#[actix_web::test]
async fn test_cors_preflight() {
    let ctx = setup();
    let app = test::init_service(create_app(ctx.dispatcher.clone(), false)).await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/refresh")
        .insert_header(("Origin", "https://client.example"))
        .insert_header(("Access-Control-Request-Method", "POST"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(resp
        .headers()
        .contains_key("access-control-allow-origin"));
}
