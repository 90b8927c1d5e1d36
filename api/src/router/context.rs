//! Request view handed to middleware and argument extractors

use actix_web::{http::Method, web, HttpRequest};
use serde_json::{Map, Value};

use tg_core::domain::RequestSession;
use tg_core::errors::{DomainError, DomainResult};

/// Everything a middleware or argument extractor may read or mutate
///
/// Header names are stored lowercased. Route parameters are filled in by the
/// dispatcher for the route currently being tried.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Path without the query string
    pub path: String,
    /// Path and query string, as received
    pub url: String,
    pub params: Map<String, Value>,
    pub query: Map<String, Value>,
    pub headers: Map<String, Value>,
    pub body: Value,
    pub session: RequestSession,
}

impl RequestContext {
    /// Context for `method url` with no headers, no body and a fresh session
    pub fn new(method: Method, url: &str) -> Self {
        let (path, query_string) = url.split_once('?').unwrap_or((url, ""));

        Self {
            method,
            path: path.to_string(),
            url: url.to_string(),
            params: Map::new(),
            query: parse_query(query_string),
            headers: Map::new(),
            body: Value::Null,
            session: RequestSession::new(),
        }
    }

    pub fn from_request(req: &HttpRequest, body: Value, session: RequestSession) -> Self {
        let url = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| req.path());

        let mut ctx = Self::new(req.method().clone(), url);
        for (name, value) in req.headers() {
            if let Ok(value) = value.to_str() {
                ctx.headers
                    .insert(name.as_str().to_string(), Value::String(value.to_string()));
            }
        }
        ctx.body = body;
        ctx.session = session;
        ctx
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), Value::String(value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(Value::as_str)
    }

    /// Resolve a field path against this request; missing values are `null`
    pub fn lookup(&self, field: &FieldPath) -> Value {
        let segments = field.segments.as_slice();
        match field.root {
            FieldRoot::Body => walk(&self.body, segments),
            FieldRoot::Params => walk_map(&self.params, segments),
            FieldRoot::Query => walk_map(&self.query, segments),
            FieldRoot::Headers => {
                let lowered: Vec<String> = segments
                    .iter()
                    .enumerate()
                    .map(|(i, s)| if i == 0 { s.to_ascii_lowercase() } else { s.clone() })
                    .collect();
                walk_map(&self.headers, &lowered)
            }
            FieldRoot::Session => {
                let session = serde_json::to_value(&self.session).unwrap_or(Value::Null);
                walk(&session, segments)
            }
            FieldRoot::Nonce => walk(&Value::String(self.session.nonce.to_string()), segments),
            FieldRoot::Method => walk(&Value::String(self.method.to_string()), segments),
            FieldRoot::Path => walk(&Value::String(self.path.clone()), segments),
            FieldRoot::Url => walk(&Value::String(self.url.clone()), segments),
        }
    }
}

/// Repeated keys collect into an array, e.g. `?ids=1&ids=2`
fn parse_query(query_string: &str) -> Map<String, Value> {
    let mut query = Map::new();
    if query_string.is_empty() {
        return query;
    }

    let pairs = web::Query::<Vec<(String, String)>>::from_query(query_string)
        .map(web::Query::into_inner)
        .unwrap_or_default();
    for (key, value) in pairs {
        let value = Value::String(value);
        match query.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                query.insert(key, value);
            }
        }
    }
    query
}

fn walk(value: &Value, segments: &[String]) -> Value {
    let mut current = value;
    for segment in segments {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Value::Null,
        }
    }
    current.clone()
}

fn walk_map(map: &Map<String, Value>, segments: &[String]) -> Value {
    match segments.split_first() {
        None => Value::Object(map.clone()),
        Some((first, rest)) => map.get(first).map_or(Value::Null, |v| walk(v, rest)),
    }
}

/// Part of the request a field path starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRoot {
    Body,
    Params,
    Query,
    Headers,
    Session,
    Nonce,
    Method,
    Path,
    Url,
}

impl FieldRoot {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "body" => FieldRoot::Body,
            "params" => FieldRoot::Params,
            "query" => FieldRoot::Query,
            "headers" => FieldRoot::Headers,
            "session" => FieldRoot::Session,
            "nonce" => FieldRoot::Nonce,
            "method" => FieldRoot::Method,
            "path" => FieldRoot::Path,
            "url" => FieldRoot::Url,
            _ => return None,
        })
    }
}

/// Dotted path into the request, e.g. `body.user.id` or `params.id`
///
/// Numeric segments index into arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    root: FieldRoot,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(path: &str) -> DomainResult<Self> {
        let mut parts = path.split('.');
        let root = parts
            .next()
            .and_then(FieldRoot::parse)
            .ok_or_else(|| DomainError::Internal {
                message: format!("Unknown argument root in '{}'", path),
            })?;

        let segments = split_segments(parts, path)?;
        Ok(Self { root, segments })
    }

    /// Path relative to the request body; an empty path is the whole body
    pub fn body(path: &str) -> DomainResult<Self> {
        let segments = if path.is_empty() {
            Vec::new()
        } else {
            split_segments(path.split('.'), path)?
        };
        Ok(Self {
            root: FieldRoot::Body,
            segments,
        })
    }

    pub fn root(&self) -> FieldRoot {
        self.root
    }
}

fn split_segments<'a>(parts: impl Iterator<Item = &'a str>, path: &str) -> DomainResult<Vec<String>> {
    parts
        .map(|segment| {
            if segment.is_empty() {
                Err(DomainError::Internal {
                    message: format!("Empty segment in argument path '{}'", path),
                })
            } else {
                Ok(segment.to_string())
            }
        })
        .collect()
}
