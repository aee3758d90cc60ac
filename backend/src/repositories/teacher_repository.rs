//! Database repository for teachers.
//!
//! Provides read-only access; teachers are provisioned directly in the database.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::database::models::Teacher;

/// Repository for teacher database operations.
pub struct TeacherRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> TeacherRepository<'a> {
    /// Creates a new TeacherRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Retrieves a teacher by its unique identifier.
    ///
    /// # Returns
    /// `Some(Teacher)` if found, `None` otherwise
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        let teacher = sqlx::query_as::<_, Teacher>(
            "SELECT id, first_name, last_name, created_at, updated_at FROM teachers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(teacher)
    }

    /// Retrieves all teachers, ordered by last name.
    pub async fn find_all(&self) -> Result<Vec<Teacher>> {
        let teachers = sqlx::query_as::<_, Teacher>(
            "SELECT id, first_name, last_name, created_at, updated_at FROM teachers ORDER BY last_name, first_name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(teachers)
    }
}
