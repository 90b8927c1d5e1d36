//! CORS middleware configuration for cross-origin requests.

use actix_cors::Cors;
use actix_web::http::{header, Method};

/// Preflight cache lifetime in seconds
pub const CORS_MAX_AGE: usize = 86_400;

/// Creates the CORS middleware.
///
/// Any origin may call the API with credentials. Preflight `OPTIONS`
/// requests are answered here and never reach the dispatcher.
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![
            Method::OPTIONS,
            Method::POST,
            Method::GET,
            Method::PUT,
            Method::DELETE,
        ])
        .allowed_headers(vec![
            header::HeaderName::from_static("x-requested-with"),
            header::HeaderName::from_static("x-http-method-override"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("authentication"),
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-consumer-username"),
            header::HeaderName::from_static("sess"),
            header::HeaderName::from_static("apikey"),
        ])
        .supports_credentials()
        .max_age(CORS_MAX_AGE)
}
