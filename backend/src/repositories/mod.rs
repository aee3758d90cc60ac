//! Persistence gateways.
//!
//! Services depend on the `UserStore` and `SessionStore` traits rather than on
//! SQLite directly; the repositories in this module are their SQLite
//! implementations.

use anyhow::Result;
use async_trait::async_trait;

use crate::database::models::{NewUser, Session, User};

pub mod session_repository;
pub mod teacher_repository;
pub mod user_repository;

/// Credential store: user records keyed by id and by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    async fn save(&self, user: NewUser) -> Result<User>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn delete_by_id(&self, id: i64) -> Result<()>;

    async fn find_all(&self) -> Result<Vec<User>>;
}

/// Session store: sessions together with their participant ids.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Session>>;

    /// Inserts when `session.id` is `None`, otherwise overwrites the row and
    /// its participant set.
    async fn save(&self, session: Session) -> Result<Session>;

    async fn delete_by_id(&self, id: i64) -> Result<()>;

    async fn find_all(&self) -> Result<Vec<Session>>;

    /// Inserts one `(session, user)` participation row. Fails on the primary
    /// key if the pair already exists.
    async fn add_participant(&self, session_id: i64, user_id: i64) -> Result<()>;

    /// Deletes one participation row; `false` if there was none.
    async fn remove_participant(&self, session_id: i64, user_id: i64) -> Result<bool>;
}

/// Whether a store error is a `UNIQUE`/primary key violation.
pub fn is_unique_violation(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}

/// Whether a store error is a foreign key violation.
pub fn is_foreign_key_violation(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_foreign_key_violation())
}
