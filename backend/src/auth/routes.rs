//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle user login and registration and are public; every
//! other router is wrapped in `jwt_auth`.

use crate::auth::handlers::*;
use axum::{Router, routing::post};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
}
