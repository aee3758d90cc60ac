//! Data structures for authentication-related entities.
//!
//! This module defines the login/signup payloads, the login response and the
//! per-request authenticated principal.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::database::models::User;

/// Login request payload
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request payload
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(
        email(message = "Must be a valid email"),
        length(max = 50, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(
        min = 3,
        max = 20,
        message = "First name must be between 3-20 characters"
    ))]
    pub first_name: String,

    #[validate(length(
        min = 3,
        max = 20,
        message = "Last name must be between 3-20 characters"
    ))]
    pub last_name: String,

    #[validate(length(
        min = 6,
        max = 40,
        message = "Password must be between 6-40 characters"
    ))]
    pub password: String,
}

/// Login response containing the bearer token and user info
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub admin: bool,
    /// Token expiration in seconds
    pub expires_in: u64,
}

/// Plain confirmation message
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Caller role, derived from the stored admin flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Regular,
    Admin,
}

impl From<bool> for Role {
    fn from(admin: bool) -> Self {
        if admin { Role::Admin } else { Role::Regular }
    }
}

/// Identity of the caller for the duration of one request.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedPrincipal {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl AuthenticatedPrincipal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<User> for AuthenticatedPrincipal {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: Role::from(user.admin),
        }
    }
}
