//! Handler functions for authentication-related API endpoints.
//!
//! These functions process login and registration requests, validate the
//! payloads, and hand off to `AuthService` and `Registrar`.

use std::sync::Arc;

use crate::api::common::{service_error_to_http, validation_error_response};
use crate::auth::models::*;
use crate::auth::registrar::Registrar;
use crate::auth::service::AuthService;
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::TokenCodec;
use crate::utils::password::PasswordHasher;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use validator::Validate;

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(tokens): Extension<Arc<TokenCodec>>,
    Extension(hasher): Extension<Arc<dyn PasswordHasher>>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<JwtResponse>, (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    let users = UserRepository::new(&pool);
    let auth_service = AuthService::new(&users, hasher.as_ref(), tokens.as_ref());

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(hasher): Extension<Arc<dyn PasswordHasher>>,
    Json(payload): Json<SignupRequest>,
) -> Result<ResponseJson<MessageResponse>, (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    let users = UserRepository::new(&pool);
    let registrar = Registrar::new(&users, hasher.as_ref());

    match registrar.register(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}
