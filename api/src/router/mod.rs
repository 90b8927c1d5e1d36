//! Declarative route registration
//!
//! Handler groups describe their endpoints with [`Endpoint`] builders. The
//! [`RouteRegistry`] collects them once at startup and hands the finished
//! table to the [`Dispatcher`].

pub mod args;
pub mod context;
pub mod dispatcher;
pub mod endpoint;
pub mod reporter;

use std::sync::Arc;

use log::{debug, info};

use tg_core::errors::{DomainError, DomainResult};

pub use args::{arg_parsers, ArgExtractor};
pub use context::{FieldPath, FieldRoot, RequestContext};
pub use dispatcher::{dispatch_request, Dispatcher};
pub use endpoint::{bind, Endpoint, Handler, Middleware};
pub use reporter::{ErrorReporter, LogErrorReporter, RequestInfo};

/// A set of endpoints registered together
pub trait RouteGroup: Send + Sync {
    fn name(&self) -> &'static str;

    /// Endpoints in declaration order
    fn endpoints(self: Arc<Self>) -> DomainResult<Vec<Endpoint>>;
}

/// Collects endpoints from route groups in registration order
#[derive(Default)]
pub struct RouteRegistry {
    groups: Vec<Arc<dyn RouteGroup>>,
    endpoints: Vec<Endpoint>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one group instance; the same instance is accepted only once
    pub fn register(&mut self, group: Arc<dyn RouteGroup>) -> DomainResult<()> {
        if self.groups.iter().any(|g| same_instance(g, &group)) {
            return Err(DomainError::Internal {
                message: format!("Route group '{}' is already registered", group.name()),
            });
        }

        let endpoints = Arc::clone(&group).endpoints()?;
        for endpoint in &endpoints {
            debug!(
                "{} {} -> {}::{}",
                endpoint.method(),
                endpoint.path_pattern(),
                group.name(),
                endpoint.key()
            );
        }
        info!("Registered {} endpoints from {}", endpoints.len(), group.name());

        self.endpoints.extend(endpoints);
        self.groups.push(group);
        Ok(())
    }

    pub fn register_all(&mut self, groups: impl IntoIterator<Item = Arc<dyn RouteGroup>>) -> DomainResult<()> {
        groups.into_iter().try_for_each(|group| self.register(group))
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn into_dispatcher(self, reporter: Arc<dyn ErrorReporter>) -> Dispatcher {
        Dispatcher::new(self.endpoints, reporter)
    }
}

fn same_instance(a: &Arc<dyn RouteGroup>, b: &Arc<dyn RouteGroup>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
