//! Handler functions for user account API endpoints.
//!
//! These functions look up accounts and let an owner delete their own
//! account; ownership is decided by the access guard inside `UserService`.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::auth::models::AuthenticatedPrincipal;
use crate::database::models::UserDto;
use crate::repositories::user_repository::UserRepository;
use crate::services::user_service::UserService;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use sqlx::SqlitePool;

/// Retrieves a user by its ID.
#[axum::debug_handler]
pub async fn get_user_by_id(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, String)> {
    tracing::info!("Getting user by ID: {} for user: {}", id, principal.id);

    let users = UserRepository::new(&pool);
    let user_service = UserService::new(&users);
    let user = user_service
        .find_by_id(id)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(user, "User retrieved successfully")))
}

/// Deletes the caller's own account.
#[axum::debug_handler]
pub async fn delete_user(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, String)> {
    let users = UserRepository::new(&pool);
    let user_service = UserService::new(&users);

    user_service
        .delete_if_owner(id, &principal)
        .await
        .map_err(|e| {
            tracing::warn!("User {} could not delete account {}: {}", principal.id, id, e);
            service_error_to_http(e)
        })?;

    Ok(Json(ApiResponse::success((), "User deleted successfully")))
}

/// Lists every account. Administrators only.
#[axum::debug_handler]
pub async fn list_users(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, (StatusCode, String)> {
    let users = UserRepository::new(&pool);
    let user_service = UserService::new(&users);

    let all = user_service
        .find_all(&principal)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::ok(all)))
}
