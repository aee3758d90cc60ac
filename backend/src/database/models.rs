//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. API-facing shapes (`SessionDto`, `UserDto`) live here as
//! well, next to the entities they are mapped from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// bcrypt hash, never serialized
    #[serde(skip_serializing)]
    pub password: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user record that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Teacher {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A yoga session together with its participant ids.
///
/// `id` and the timestamps are `None` until the session has been saved.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: Option<i64>,
    pub name: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub teacher_id: Option<i64>,
    pub users: Vec<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Whether `user_id` is in the participant list.
    pub fn has_participant(&self, user_id: i64) -> bool {
        self.users.iter().any(|id| *id == user_id)
    }
}

/// Session payload exchanged with API clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SessionDto {
    pub id: Option<i64>,

    #[validate(
        required(message = "Name is required"),
        length(min = 1, max = 50, message = "Name must be between 1-50 characters")
    )]
    pub name: Option<String>,

    /// Milliseconds since the Unix epoch on the wire.
    #[validate(required(message = "Date is required"))]
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub date: Option<DateTime<Utc>>,

    #[validate(required(message = "Teacher is required"))]
    pub teacher_id: Option<i64>,

    pub users: Vec<i64>,

    #[validate(
        required(message = "Description is required"),
        length(
            min = 1,
            max = 2500,
            message = "Description must be between 1-2500 characters"
        )
    )]
    pub description: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            name: Some(session.name),
            date: Some(session.date),
            teacher_id: session.teacher_id,
            users: session.users,
            description: Some(session.description),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

/// User payload returned to API clients (no password hash).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            last_name: user.last_name,
            first_name: user.first_name,
            admin: user.admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
