//! Database repository for yoga sessions and their participants.
//!
//! A session row lives in `sessions`; its participant ids live in the
//! `participate` join table, keyed by `(session_id, user_id)`.

use std::collections::HashMap;

use crate::database::models::Session;
use crate::repositories::SessionStore;
use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, FromRow)]
struct SessionRow {
    id: i64,
    name: String,
    date: DateTime<Utc>,
    description: String,
    teacher_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self, users: Vec<i64>) -> Session {
        Session {
            id: Some(self.id),
            name: self.name,
            date: self.date,
            description: self.description,
            teacher_id: self.teacher_id,
            users,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }
}

const SESSION_COLUMNS: &str =
    "id, name, date, description, teacher_id, created_at, updated_at";

/// Repository for session database operations.
pub struct SessionRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> SessionRepository<'a> {
    /// Creates a new SessionRepository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    async fn participants(&self, session_id: i64) -> Result<Vec<i64>> {
        let users = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM participate WHERE session_id = ? ORDER BY user_id",
        )
        .bind(session_id)
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }
}

#[async_trait]
impl SessionStore for SessionRepository<'_> {
    async fn find_by_id(&self, id: i64) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let users = self.participants(row.id).await?;
                Ok(Some(row.into_session(users)))
            }
            None => Ok(None),
        }
    }

    /// Writes the session row and replaces its participant set in one
    /// transaction. A participant list holding the same id twice fails on the
    /// `participate` primary key and nothing is written.
    async fn save(&self, session: Session) -> Result<Session> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let row = match session.id {
            None => {
                sqlx::query_as::<_, SessionRow>(&format!(
                    r#"
                    INSERT INTO sessions (name, date, description, teacher_id, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?)
                    RETURNING {SESSION_COLUMNS}
                    "#
                ))
                .bind(&session.name)
                .bind(session.date)
                .bind(&session.description)
                .bind(session.teacher_id)
                .bind(now)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?
            }
            Some(id) => {
                let row = sqlx::query_as::<_, SessionRow>(&format!(
                    r#"
                    UPDATE sessions
                    SET name = ?, date = ?, description = ?, teacher_id = ?, updated_at = ?
                    WHERE id = ?
                    RETURNING {SESSION_COLUMNS}
                    "#
                ))
                .bind(&session.name)
                .bind(session.date)
                .bind(&session.description)
                .bind(session.teacher_id)
                .bind(now)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

                match row {
                    Some(row) => row,
                    None => bail!("session {} does not exist", id),
                }
            }
        };

        sqlx::query("DELETE FROM participate WHERE session_id = ?")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;

        for user_id in &session.users {
            sqlx::query("INSERT INTO participate (session_id, user_id) VALUES (?, ?)")
                .bind(row.id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(row.into_session(session.users))
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Session>> {
        let rows = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions ORDER BY date, id"
        ))
        .fetch_all(self.pool)
        .await?;

        let pairs = sqlx::query_as::<_, (i64, i64)>(
            "SELECT session_id, user_id FROM participate ORDER BY session_id, user_id",
        )
        .fetch_all(self.pool)
        .await?;

        let mut participants: HashMap<i64, Vec<i64>> = HashMap::new();
        for (session_id, user_id) in pairs {
            participants.entry(session_id).or_default().push(user_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let users = participants.remove(&row.id).unwrap_or_default();
                row.into_session(users)
            })
            .collect())
    }

    async fn add_participant(&self, session_id: i64, user_id: i64) -> Result<()> {
        sqlx::query("INSERT INTO participate (session_id, user_id) VALUES (?, ?)")
            .bind(session_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    async fn remove_participant(&self, session_id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM participate WHERE session_id = ? AND user_id = ?")
            .bind(session_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewUser;
    use crate::database::{seed_teacher, test_pool};
    use crate::repositories::UserStore;
    use crate::repositories::user_repository::UserRepository;

    fn draft(name: &str, teacher_id: Option<i64>) -> Session {
        Session {
            id: None,
            name: name.to_string(),
            date: Utc::now(),
            description: "Slow flow".to_string(),
            teacher_id,
            users: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    async fn user(pool: &SqlitePool, email: &str) -> i64 {
        UserRepository::new(pool)
            .save(NewUser {
                email: email.to_string(),
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                password_hash: "hash".to_string(),
                admin: false,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_insert_and_reload_with_participants() {
        let pool = test_pool().await;
        let repo = SessionRepository::new(&pool);
        let teacher = seed_teacher(&pool, "Margot", "Delahaye").await;
        let a = user(&pool, "a@studio.com").await;
        let b = user(&pool, "b@studio.com").await;

        let mut session = draft("Vinyasa", Some(teacher));
        session.users = vec![b, a];
        let saved = repo.save(session).await.unwrap();
        assert!(saved.id.is_some());
        assert!(saved.created_at.is_some());

        let loaded = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(loaded.teacher_id, Some(teacher));
        assert_eq!(loaded.users, vec![a, b]);
    }

    #[tokio::test]
    async fn test_session_without_teacher() {
        let pool = test_pool().await;
        let repo = SessionRepository::new(&pool);

        let saved = repo.save(draft("Hatha", None)).await.unwrap();
        let loaded = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(loaded.teacher_id, None);
    }

    #[tokio::test]
    async fn test_update_replaces_participants() {
        let pool = test_pool().await;
        let repo = SessionRepository::new(&pool);
        let a = user(&pool, "a@studio.com").await;
        let b = user(&pool, "b@studio.com").await;

        let mut session = draft("Yin", None);
        session.users = vec![a];
        let mut saved = repo.save(session).await.unwrap();

        saved.name = "Yin & Yang".to_string();
        saved.users = vec![b];
        let updated = repo.save(saved.clone()).await.unwrap();
        assert_eq!(updated.id, saved.id);

        let loaded = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Yin & Yang");
        assert_eq!(loaded.users, vec![b]);
    }

    #[tokio::test]
    async fn test_duplicate_participant_rejected_by_storage() {
        let pool = test_pool().await;
        let repo = SessionRepository::new(&pool);
        let a = user(&pool, "a@studio.com").await;
        let saved = repo.save(draft("Yin", None)).await.unwrap();

        let mut duplicated = saved.clone();
        duplicated.users = vec![a, a];
        assert!(repo.save(duplicated).await.is_err());

        // the failed transaction left the session untouched
        let loaded = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert!(loaded.users.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_session_fails() {
        let pool = test_pool().await;
        let repo = SessionRepository::new(&pool);

        let mut ghost = draft("Ghost", None);
        ghost.id = Some(404);
        assert!(repo.save(ghost).await.is_err());
    }

    #[tokio::test]
    async fn test_find_all_and_delete() {
        let pool = test_pool().await;
        let repo = SessionRepository::new(&pool);
        let a = user(&pool, "a@studio.com").await;

        let mut first = draft("Morning", None);
        first.users = vec![a];
        let first = repo.save(first).await.unwrap();
        let second = repo.save(draft("Evening", None)).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        let morning = all.iter().find(|s| s.id == first.id).unwrap();
        assert_eq!(morning.users, vec![a]);

        repo.delete_by_id(first.id.unwrap()).await.unwrap();
        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, second.id);
    }

    #[tokio::test]
    async fn test_single_participant_rows() {
        let pool = test_pool().await;
        let repo = SessionRepository::new(&pool);
        let a = user(&pool, "a@studio.com").await;
        let b = user(&pool, "b@studio.com").await;
        let id = repo.save(draft("Yin", None)).await.unwrap().id.unwrap();

        repo.add_participant(id, a).await.unwrap();
        repo.add_participant(id, b).await.unwrap();

        let err = repo.add_participant(id, a).await.unwrap_err();
        assert!(crate::repositories::is_unique_violation(&err));

        let err = repo.add_participant(id + 1, a).await.unwrap_err();
        assert!(crate::repositories::is_foreign_key_violation(&err));

        assert!(repo.remove_participant(id, a).await.unwrap());
        assert!(!repo.remove_participant(id, a).await.unwrap());

        let loaded = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(loaded.users, vec![b]);
    }

    #[tokio::test]
    async fn test_deleting_user_removes_participation() {
        let pool = test_pool().await;
        let repo = SessionRepository::new(&pool);
        let a = user(&pool, "a@studio.com").await;

        let mut session = draft("Morning", None);
        session.users = vec![a];
        let saved = repo.save(session).await.unwrap();

        UserRepository::new(&pool).delete_by_id(a).await.unwrap();
        let loaded = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert!(loaded.users.is_empty());
    }
}
