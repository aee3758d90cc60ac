//! Module for teacher API endpoints (read only).

pub mod handlers;
pub mod routes;
