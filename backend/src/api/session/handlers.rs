//! Handler functions for yoga session API endpoints.
//!
//! The authenticated principal comes from `jwt_auth` through the request
//! extensions and is handed to the services explicitly.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::auth::models::AuthenticatedPrincipal;
use crate::database::models::SessionDto;
use crate::repositories::session_repository::SessionRepository;
use crate::repositories::teacher_repository::TeacherRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::membership_service::{MembershipService, SessionLocks};
use crate::services::session_service::SessionService;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use sqlx::SqlitePool;

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, String)>;

/// Lists all sessions.
#[axum::debug_handler]
pub async fn list_sessions(
    Extension(pool): Extension<SqlitePool>,
    Extension(locks): Extension<SessionLocks>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> HandlerResult<Vec<SessionDto>> {
    tracing::debug!("Listing sessions for user {}", principal.id);

    let sessions = SessionRepository::new(&pool);
    let users = UserRepository::new(&pool);
    let teachers = TeacherRepository::new(&pool);
    let service = SessionService::new(&sessions, &users, &teachers, &locks);

    let all = service.find_all().await.map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(
        all.into_iter().map(SessionDto::from).collect(),
        "Sessions retrieved successfully",
    )))
}

/// Retrieves a session by its ID.
#[axum::debug_handler]
pub async fn get_session_by_id(
    Extension(pool): Extension<SqlitePool>,
    Extension(locks): Extension<SessionLocks>,
    Path(id): Path<i64>,
) -> HandlerResult<SessionDto> {
    let sessions = SessionRepository::new(&pool);
    let users = UserRepository::new(&pool);
    let teachers = TeacherRepository::new(&pool);
    let service = SessionService::new(&sessions, &users, &teachers, &locks);

    let session = service.find_by_id(id).await.map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(
        session.into(),
        "Session retrieved successfully",
    )))
}

/// Creates a new session.
#[axum::debug_handler]
pub async fn create_session(
    Extension(pool): Extension<SqlitePool>,
    Extension(locks): Extension<SessionLocks>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
    Json(payload): Json<SessionDto>,
) -> HandlerResult<SessionDto> {
    let sessions = SessionRepository::new(&pool);
    let users = UserRepository::new(&pool);
    let teachers = TeacherRepository::new(&pool);
    let service = SessionService::new(&sessions, &users, &teachers, &locks);

    let session = service.create(payload).await.map_err(|e| {
        tracing::warn!("Session creation by user {} failed: {}", principal.id, e);
        service_error_to_http(e)
    })?;

    Ok(Json(ApiResponse::success(
        session.into(),
        "Session created successfully",
    )))
}

/// Replaces a session, participant list included.
#[axum::debug_handler]
pub async fn update_session(
    Extension(pool): Extension<SqlitePool>,
    Extension(locks): Extension<SessionLocks>,
    Path(id): Path<i64>,
    Json(payload): Json<SessionDto>,
) -> HandlerResult<SessionDto> {
    let sessions = SessionRepository::new(&pool);
    let users = UserRepository::new(&pool);
    let teachers = TeacherRepository::new(&pool);
    let service = SessionService::new(&sessions, &users, &teachers, &locks);

    let session = service
        .update(id, payload)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(
        session.into(),
        "Session updated successfully",
    )))
}

/// Deletes a session.
#[axum::debug_handler]
pub async fn delete_session(
    Extension(pool): Extension<SqlitePool>,
    Extension(locks): Extension<SessionLocks>,
    Path(id): Path<i64>,
) -> HandlerResult<()> {
    let sessions = SessionRepository::new(&pool);
    let users = UserRepository::new(&pool);
    let teachers = TeacherRepository::new(&pool);
    let service = SessionService::new(&sessions, &users, &teachers, &locks);

    service
        .delete_if_exists(id)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success((), "Session deleted successfully")))
}

/// Adds a user to a session.
#[axum::debug_handler]
pub async fn participate(
    Extension(pool): Extension<SqlitePool>,
    Extension(locks): Extension<SessionLocks>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> HandlerResult<()> {
    let sessions = SessionRepository::new(&pool);
    let users = UserRepository::new(&pool);
    let service = MembershipService::new(&sessions, &users, &locks);

    service
        .join(&principal, id, user_id)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success((), "Joined session")))
}

/// Removes a user from a session.
#[axum::debug_handler]
pub async fn withdraw(
    Extension(pool): Extension<SqlitePool>,
    Extension(locks): Extension<SessionLocks>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> HandlerResult<()> {
    let sessions = SessionRepository::new(&pool);
    let users = UserRepository::new(&pool);
    let service = MembershipService::new(&sessions, &users, &locks);

    service
        .leave(&principal, id, user_id)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success((), "Left session")))
}
