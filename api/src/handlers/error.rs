//! Translation of domain errors into HTTP responses

use actix_web::{http::StatusCode, HttpResponse};

use tg_core::errors::DomainError;
use tg_shared::ErrorResponse;

/// Response body and status for a failed request
pub fn error_response(error: &DomainError) -> HttpResponse {
    let status = error.status_code();
    let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if code.is_server_error() {
        log::error!("Domain Error: {:?}", error);
    } else {
        log::debug!("Domain Error: {:?}", error);
    }

    let mut body = ErrorResponse::new(code.as_u16(), error.to_string());
    if let Some(details) = error.details() {
        body = body.with_details(details);
    }

    HttpResponse::build(code).json(body)
}
