//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the API domains (sessions,
//! teachers, users) and assembles them, together with the authentication
//! routes, into the application router.

use std::sync::Arc;

use axum::{Extension, Router, response::Json, routing::get};
use sqlx::SqlitePool;

use crate::api::common::ApiResponse;
use crate::auth;
use crate::services::membership_service::SessionLocks;
use crate::utils::jwt::TokenCodec;
use crate::utils::password::PasswordHasher;

pub mod common;
pub mod session;
pub mod teacher;
pub mod user;


/// Builds the application router with all shared state attached as
/// extensions.
pub fn app_router(
    pool: SqlitePool,
    tokens: Arc<TokenCodec>,
    hasher: Arc<dyn PasswordHasher>,
    locks: SessionLocks,
) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/api/auth", auth::routes::auth_router())
        .nest("/api/session", session::routes::session_router())
        .nest("/api/teacher", teacher::routes::teacher_router())
        .nest("/api/user", user::routes::user_router())
        .layer(Extension(pool))
        .layer(Extension(tokens))
        .layer(Extension(hasher))
        .layer(Extension(locks))
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "Studio Backend",
            "version": env!("CARGO_PKG_VERSION")
        }),
        "Welcome to the Studio API",
    ))
}
