//! Module for core business logic services.
//!
//! Services take borrowed stores, are built per request, and orchestrate the
//! repositories, the access guard and the session locks.

pub mod membership_service;
pub mod session_service;
pub mod teacher_service;
pub mod user_service;
