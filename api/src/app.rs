//! Application factory
//!
//! Builds the dispatcher from the registered route groups and wraps it in
//! the actix-web middleware stack.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{Condition, Logger},
    web, App, Error,
};

use tg_core::errors::DomainResult;
use tg_core::services::Authenticator;

use crate::middleware::{cors::create_cors, session::SessionMiddleware};
use crate::router::{dispatch_request, Dispatcher, ErrorReporter, RouteRegistry};
use crate::routes;

/// Register every route group and compile the route table
pub fn build_dispatcher(
    authenticator: Arc<dyn Authenticator>,
    reporter: Arc<dyn ErrorReporter>,
    logging: bool,
) -> DomainResult<Dispatcher> {
    let mut registry = RouteRegistry::new();
    registry.register_all(routes::groups(authenticator))?;
    Ok(registry.into_dispatcher(reporter).with_logging(logging))
}

/// Create and configure the application around a shared dispatcher
pub fn create_app(
    dispatcher: web::Data<Dispatcher>,
    logging: bool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    // Outermost last: logging, then CORS, then the session
    App::new()
        .app_data(dispatcher)
        .wrap(SessionMiddleware::new())
        .wrap(create_cors())
        .wrap(Condition::new(logging, Logger::default()))
        .default_service(web::to(dispatch_request))
}
