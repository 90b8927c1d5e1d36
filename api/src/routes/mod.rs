//! Route groups, registered in the order listed by [`groups`]

pub mod auth;

use std::sync::Arc;

use tg_core::services::Authenticator;

use crate::router::RouteGroup;

pub use auth::AuthRouter;

/// Every route group of the application, in registration order
pub fn groups(authenticator: Arc<dyn Authenticator>) -> Vec<Arc<dyn RouteGroup>> {
    vec![Arc::new(AuthRouter::new(authenticator))]
}
