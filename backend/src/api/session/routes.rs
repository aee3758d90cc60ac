//! Defines the HTTP routes for yoga sessions.
//!
//! Every route requires a bearer token.

use super::handlers::{
    create_session, delete_session, get_session_by_id, list_sessions, participate,
    update_session, withdraw,
};
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn session_router() -> Router {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route(
            "/{id}",
            get(get_session_by_id)
                .put(update_session)
                .delete(delete_session),
        )
        .route(
            "/{id}/participate/{user_id}",
            post(participate).delete(withdraw),
        )
        .route_layer(middleware::from_fn(jwt_auth))
}
