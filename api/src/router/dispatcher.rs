//! Request dispatcher: route lookup, middleware, handler, error translation

use std::sync::Arc;

use actix_web::dev::{Path, ResourceDef};
use actix_web::http::Method;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use log::{debug, info};
use serde_json::{Map, Value};

use tg_core::domain::RequestSession;
use tg_core::errors::{AuthError, DomainError, DomainResult, ValidationError};

use super::context::RequestContext;
use super::endpoint::Endpoint;
use super::reporter::{ErrorReporter, RequestInfo};
use crate::handlers::error::error_response;

struct Route {
    def: ResourceDef,
    endpoint: Endpoint,
}

/// Owns the compiled route table
///
/// Routes are tried in registration order; the first whose method and path
/// match handles the request unless it passes.
pub struct Dispatcher {
    routes: Vec<Route>,
    reporter: Arc<dyn ErrorReporter>,
    logging: bool,
}

impl Dispatcher {
    /// # Panics
    ///
    /// Panics if an endpoint path is not a valid `ResourceDef` pattern.
    pub fn new(endpoints: Vec<Endpoint>, reporter: Arc<dyn ErrorReporter>) -> Self {
        let routes = endpoints
            .into_iter()
            .map(|endpoint| Route {
                def: ResourceDef::new(endpoint.path_pattern()),
                endpoint,
            })
            .collect();

        Self {
            routes,
            reporter,
            logging: false,
        }
    }

    /// Log each request URL and body
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.routes.iter().map(|route| &route.endpoint)
    }

    /// Handle a raw actix request and its body bytes
    pub async fn dispatch(&self, req: &HttpRequest, body: &[u8]) -> HttpResponse {
        let session = req
            .extensions()
            .get::<RequestSession>()
            .cloned()
            .unwrap_or_default();

        if self.logging {
            info!("URL: {}", req.uri());
        }

        let body = if is_json_request(req) {
            parse_body(body)
        } else {
            Ok(Value::Object(Map::new()))
        };
        let body = match body {
            Ok(body) => body,
            Err(err) => {
                debug!("Rejected unparseable body on {} {}", req.method(), req.uri());
                return error_response(&err);
            }
        };

        if self.logging && !is_empty_body(&body) {
            if let Ok(pretty) = serde_json::to_string_pretty(&body) {
                info!("{}", pretty);
            }
        }

        self.handle(RequestContext::from_request(req, body, session))
            .await
    }

    /// Route a prepared request context
    pub async fn handle(&self, mut ctx: RequestContext) -> HttpResponse {
        let request = RequestInfo {
            method: ctx.method.to_string(),
            url: ctx.url.clone(),
        };

        for route in &self.routes {
            if !method_matches(route.endpoint.method(), &ctx.method) {
                continue;
            }

            let Some(path) = match_path(&route.def, &ctx.path) else {
                continue;
            };
            ctx.params = path
                .iter()
                .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
                .collect();

            match route.endpoint.run(&mut ctx).await {
                Ok(Value::Null) => return HttpResponse::Ok().finish(),
                Ok(value) => return HttpResponse::Ok().json(value),
                Err(DomainError::PassThrough) => {
                    debug!("{} passed on {} {}", route.endpoint.key(), request.method, request.url);
                }
                Err(err) => {
                    self.reporter.report(&err, &request);
                    return error_response(&err);
                }
            }
        }

        let err = if ctx.session.is_authenticated() {
            DomainError::from(AuthError::PermissionDenied)
        } else {
            DomainError::NotFound {
                method: request.method,
                path: request.url,
            }
        };
        error_response(&err)
    }
}

/// actix default service forwarding every request to the dispatcher
pub async fn dispatch_request(
    req: HttpRequest,
    body: web::Bytes,
    dispatcher: web::Data<Dispatcher>,
) -> HttpResponse {
    dispatcher.dispatch(&req, &body).await
}

/// Match `path`, or `path` without one trailing slash
fn match_path(def: &ResourceDef, path: &str) -> Option<Path<String>> {
    let mut exact = Path::new(path.to_string());
    if def.capture_match_info(&mut exact) {
        return Some(exact);
    }

    let trimmed = path.strip_suffix('/').filter(|p| !p.is_empty())?;
    let mut loose = Path::new(trimmed.to_string());
    def.capture_match_info(&mut loose).then_some(loose)
}

/// HEAD requests are also served by GET routes
fn method_matches(route: &Method, request: &Method) -> bool {
    route == request || (*request == Method::HEAD && *route == Method::GET)
}

/// `application/json` and `*/*+json` bodies are parsed, anything else reads as `{}`
fn is_json_request(req: &HttpRequest) -> bool {
    match req.mime_type() {
        Ok(Some(mime)) => {
            mime.type_().as_str() == "application"
                && (mime.subtype().as_str() == "json" || mime.suffix().is_some_and(|s| s.as_str() == "json"))
        }
        _ => false,
    }
}

/// An empty body reads as `{}`
fn parse_body(bytes: &[u8]) -> DomainResult<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(bytes).map_err(|e| {
        ValidationError::MalformedBody {
            reason: e.to_string(),
        }
        .into()
    })
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
