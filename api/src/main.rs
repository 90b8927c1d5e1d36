use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use log::info;

use tg_api::app::{build_dispatcher, create_app};
use tg_api::router::LogErrorReporter;
use tg_core::services::{Authenticator, TokenAuthenticator, TokenServiceConfig};
use tg_infra::open_store;
use tg_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    info!("Starting {}", config.server.name);

    let store = open_store(&config.db.redis)
        .await
        .context("Failed to open token store")?;

    let authenticator: Arc<dyn Authenticator> = Arc::new(TokenAuthenticator::new(
        Arc::clone(&store),
        TokenServiceConfig::from(&config.auth),
    ));
    let reporter = Arc::new(LogErrorReporter::new(config.server.name.clone()));

    let logging = config.server.logging;
    let dispatcher = web::Data::new(
        build_dispatcher(authenticator, reporter, logging).context("Failed to register routes")?,
    );

    let bind_address = config.server.bind_address();
    if logging {
        info!("Listen on port {}...", config.server.http_port);
    }

    HttpServer::new(move || create_app(dispatcher.clone(), logging))
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    store.close().await?;
    info!("Server stopped");
    Ok(())
}
