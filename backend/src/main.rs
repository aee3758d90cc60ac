//! Main entry point for the studio backend.
//!
//! This file initializes tracing, loads configuration, sets up the database
//! connection and its migrations, and serves the API until Ctrl-C.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use std::sync::Arc;

use anyhow::Context;
use config::Config;
use database::Database;
use services::membership_service::SessionLocks;
use tracing::info;
use tracing_subscriber::fmt::init;
use utils::jwt::TokenCodec;
use utils::password::{BcryptHasher, PasswordHasher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    db.migrate().await?;

    let tokens = Arc::new(TokenCodec::from_config(&config));
    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::new(config.auth.bcrypt_cost));

    let app = api::app_router(db.pool().clone(), tokens, hasher, SessionLocks::default());

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;

    info!("Starting studio server on port {}", config.server_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
