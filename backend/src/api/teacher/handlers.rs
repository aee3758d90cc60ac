//! Handler functions for teacher API endpoints.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::database::models::Teacher;
use crate::repositories::teacher_repository::TeacherRepository;
use crate::services::teacher_service::TeacherService;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use sqlx::SqlitePool;

/// Lists all teachers.
#[axum::debug_handler]
pub async fn list_teachers(
    Extension(pool): Extension<SqlitePool>,
) -> Result<Json<ApiResponse<Vec<Teacher>>>, (StatusCode, String)> {
    let teachers = TeacherRepository::new(&pool);
    let service = TeacherService::new(&teachers);

    let all = service.find_all().await.map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::ok(all)))
}

/// Retrieves a teacher by its ID.
#[axum::debug_handler]
pub async fn get_teacher_by_id(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Teacher>>, (StatusCode, String)> {
    let teachers = TeacherRepository::new(&pool);
    let service = TeacherService::new(&teachers);

    let teacher = service.find_by_id(id).await.map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::ok(teacher)))
}
