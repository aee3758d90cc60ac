//! Module for yoga session API endpoints.
//!
//! Session CRUD plus joining and leaving a session.

pub mod handlers;
pub mod routes;
