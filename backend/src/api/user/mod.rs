//! Module for user account API endpoints.

pub mod handlers;
pub mod routes;
