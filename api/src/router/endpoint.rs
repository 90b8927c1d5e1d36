//! Endpoint definitions and the handler/middleware seams

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use actix_web::http::Method;
use async_trait::async_trait;
use serde_json::Value;

use tg_core::errors::DomainResult;

use super::args::ArgExtractor;
use super::context::RequestContext;
use crate::middleware::valid_body::ValidBody;

/// Request step run before the handler; any error aborts the chain
#[async_trait(?Send)]
pub trait Middleware: Send + Sync {
    async fn handle(&self, ctx: &mut RequestContext) -> DomainResult<()>;
}

#[async_trait(?Send)]
impl<F> Middleware for F
where
    F: Fn(&mut RequestContext) -> DomainResult<()> + Send + Sync,
{
    async fn handle(&self, ctx: &mut RequestContext) -> DomainResult<()> {
        (self)(ctx)
    }
}

/// Endpoint body, called with the extracted arguments in declared order
///
/// Returning `DomainError::PassThrough` hands the request to the next
/// matching route.
#[async_trait(?Send)]
pub trait Handler: Send + Sync {
    async fn call(&self, args: Vec<Value>) -> DomainResult<Value>;
}

#[async_trait(?Send)]
impl<F, Fut> Handler for F
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = DomainResult<Value>> + 'static,
{
    async fn call(&self, args: Vec<Value>) -> DomainResult<Value> {
        (self)(args).await
    }
}

/// Handler calling `f` with a shared route-group instance
///
/// Lets groups expose `async fn(self: Arc<Self>, args)` methods as handlers.
pub fn bind<T, F, Fut>(target: &Arc<T>, f: F) -> impl Handler
where
    T: Send + Sync + ?Sized + 'static,
    F: Fn(Arc<T>, Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = DomainResult<Value>> + 'static,
{
    let target = Arc::clone(target);
    move |args: Vec<Value>| f(Arc::clone(&target), args)
}

/// One `(METHOD, PATH)` pair bound to a handler
///
/// Built with chained calls that apply in call order:
///
/// ```ignore
/// Endpoint::post("refresh", handler)
///     .valid_body(&schema)?
///     .body_args(&["refresh_token"])?
/// ```
pub struct Endpoint {
    key: String,
    method: Method,
    path: String,
    args: Vec<ArgExtractor>,
    middlewares: Vec<Arc<dyn Middleware>>,
    handler: Arc<dyn Handler>,
}

impl Endpoint {
    /// Endpoint at `/` + `key` until `.path(..)` says otherwise
    pub fn new(method: Method, key: impl Into<String>, handler: impl Handler + 'static) -> Self {
        let key = key.into();
        Self {
            path: format!("/{}", key),
            key,
            method,
            args: Vec::new(),
            middlewares: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn get(key: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self::new(Method::GET, key, handler)
    }

    pub fn post(key: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self::new(Method::POST, key, handler)
    }

    pub fn put(key: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self::new(Method::PUT, key, handler)
    }

    pub fn patch(key: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self::new(Method::PATCH, key, handler)
    }

    pub fn delete(key: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self::new(Method::DELETE, key, handler)
    }

    pub fn options(key: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self::new(Method::OPTIONS, key, handler)
    }

    pub fn head(key: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self::new(Method::HEAD, key, handler)
    }

    /// Path pattern in actix `ResourceDef` syntax, e.g. `/users/{id}`
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Replace the argument extractors
    pub fn args(mut self, args: impl IntoIterator<Item = ArgExtractor>) -> Self {
        self.args = args.into_iter().collect();
        self
    }

    /// Replace the argument extractors with paths relative to the body
    pub fn body_args(mut self, paths: &[&str]) -> DomainResult<Self> {
        self.args = paths
            .iter()
            .map(|path| ArgExtractor::body(path))
            .collect::<DomainResult<_>>()?;
        Ok(self)
    }

    pub fn middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Append a middleware validating the body against a JSON schema
    pub fn valid_body(self, schema: &Value) -> DomainResult<Self> {
        Ok(self.middleware(ValidBody::compile(schema)?))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path_pattern(&self) -> &str {
        &self.path
    }

    /// Middleware chain, then argument extraction, then the handler
    pub(crate) async fn run(&self, ctx: &mut RequestContext) -> DomainResult<Value> {
        for middleware in &self.middlewares {
            middleware.handle(ctx).await?;
        }

        let args = self.args.iter().map(|arg| arg.extract(ctx)).collect();
        self.handler.call(args).await
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("key", &self.key)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("args", &self.args)
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}
