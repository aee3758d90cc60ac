//! Middleware for protecting authenticated routes.
//!
//! Validates the bearer token, loads the caller from the user store and puts
//! the resulting `AuthenticatedPrincipal` into the request extensions, where
//! handlers pick it up and pass it on explicitly.

use std::sync::Arc;

use crate::api::common::service_error_to_http;
use crate::auth::service::AuthService;
use crate::errors::ServiceError;
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::TokenCodec;
use crate::utils::password::PasswordHasher;
use axum::{
    extract::{Extension, Request},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

/// Extract the token from an `Authorization: Bearer <token>` header value
fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// JWT authentication middleware
pub async fn jwt_auth(
    Extension(pool): Extension<SqlitePool>,
    Extension(tokens): Extension<Arc<TokenCodec>>,
    Extension(hasher): Extension<Arc<dyn PasswordHasher>>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| service_error_to_http(ServiceError::AuthenticationFailed))?
        .to_string();

    let users = UserRepository::new(&pool);
    let auth_service = AuthService::new(&users, hasher.as_ref(), tokens.as_ref());

    let principal = auth_service
        .authenticate(&token)
        .await
        .map_err(service_error_to_http)?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
