//! Authentication and authorization.
//!
//! This module provides login and registration, bearer-token resolution into
//! an `AuthenticatedPrincipal`, the pure access guard, and the HTTP surface
//! (handlers, routes and the `jwt_auth` middleware).

pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod registrar;
pub mod routes;
pub mod service;
