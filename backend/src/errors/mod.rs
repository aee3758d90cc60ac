//! Global application error types.
//!
//! This module defines the error type returned by every service of the
//! backend. Each variant is an expected, typed outcome; the HTTP layer maps
//! them to status codes in `api::common::service_error_to_http`.

use thiserror::Error;

/// Generic service error that can be used across all entities
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Bad credentials, or an invalid, expired or orphaned token.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// The caller is authenticated but the access guard denied the action.
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Error: Email is already taken!")]
    DuplicateEmail { email: String },

    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    #[error("User {user_id} already participates in session {session_id}")]
    AlreadyMember { session_id: i64, user_id: i64 },

    #[error("User {user_id} does not participate in session {session_id}")]
    NotMember { session_id: i64, user_id: i64 },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.to_string(),
        }
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}
