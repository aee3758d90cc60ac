//! Defines the HTTP routes for teachers.

use super::handlers::{get_teacher_by_id, list_teachers};
use crate::auth::middleware::jwt_auth;
use axum::{Router, middleware, routing::get};

pub fn teacher_router() -> Router {
    Router::new()
        .route("/", get(list_teachers))
        .route("/{id}", get(get_teacher_by_id))
        .route_layer(middleware::from_fn(jwt_auth))
}
