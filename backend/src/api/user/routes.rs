//! Defines the HTTP routes for user accounts.
//!
//! Registration is under `/api/auth`; these routes read and delete existing
//! accounts.

use super::handlers::{delete_user, get_user_by_id, list_users};
use crate::auth::middleware::jwt_auth;
use axum::{Router, middleware, routing::get};

pub fn user_router() -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user_by_id).delete(delete_user))
        .route_layer(middleware::from_fn(jwt_auth))
}
