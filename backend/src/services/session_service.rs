//! Session business logic service.
//!
//! Handles creation, lookup, update and deletion of yoga sessions. Joining
//! and leaving lives in `membership_service`.

use tracing::info;
use validator::Validate;

use crate::database::models::{Session, SessionDto};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::teacher_repository::TeacherRepository;
use crate::repositories::{SessionStore, UserStore};
use crate::services::membership_service::SessionLocks;

pub struct SessionService<'a> {
    sessions: &'a dyn SessionStore,
    users: &'a dyn UserStore,
    teachers: &'a TeacherRepository<'a>,
    locks: &'a SessionLocks,
}

impl<'a> SessionService<'a> {
    /// Creates a new SessionService instance.
    ///
    /// `locks` must be the table `MembershipService` uses, so that updates
    /// and deletes do not interleave with joins and leaves.
    pub fn new(
        sessions: &'a dyn SessionStore,
        users: &'a dyn UserStore,
        teachers: &'a TeacherRepository<'a>,
        locks: &'a SessionLocks,
    ) -> Self {
        Self {
            sessions,
            users,
            teachers,
            locks,
        }
    }

    /// Creates a session from a validated payload.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` when the payload is incomplete.
    pub async fn create(&self, dto: SessionDto) -> ServiceResult<Session> {
        let session = self.to_session(None, dto).await?;
        let session = self.sessions.save(session).await?;

        info!(
            "Created session {} ({})",
            session.id.unwrap_or_default(),
            session.name
        );
        Ok(session)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Session> {
        self.sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Session", id))
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Session>> {
        Ok(self.sessions.find_all().await?)
    }

    /// Overwrites session `id` with the payload, participant list included.
    ///
    /// The id from the path wins over any id in the payload.
    pub async fn update(&self, id: i64, dto: SessionDto) -> ServiceResult<Session> {
        let _guard = self.locks.acquire(id).await;

        if self.sessions.find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("Session", id));
        }

        let session = self.to_session(Some(id), dto).await?;
        let session = self.sessions.save(session).await?;

        info!("Updated session {}", id);
        Ok(session)
    }

    pub async fn delete_if_exists(&self, id: i64) -> ServiceResult<()> {
        let _guard = self.locks.acquire(id).await;

        if self.sessions.find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("Session", id));
        }

        self.sessions.delete_by_id(id).await?;

        info!("Deleted session {}", id);
        Ok(())
    }

    /// Maps a payload onto a `Session`.
    ///
    /// A teacher id with no matching teacher becomes "no teacher". Unknown
    /// user ids are dropped and repeated ones collapsed.
    async fn to_session(&self, id: Option<i64>, dto: SessionDto) -> ServiceResult<Session> {
        if let Err(validation_errors) = dto.validate() {
            let error_messages: Vec<String> = validation_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        format!(
                            "{}: {}",
                            field,
                            error.message.as_ref().unwrap_or(&"Invalid value".into())
                        )
                    })
                })
                .collect();

            return Err(ServiceError::validation(error_messages.join(", ")));
        }

        let SessionDto {
            name: Some(name),
            date: Some(date),
            description: Some(description),
            teacher_id,
            users: requested_users,
            ..
        } = dto
        else {
            return Err(ServiceError::validation(
                "name, date and description are required",
            ));
        };

        let teacher_id = match teacher_id {
            Some(teacher_id) => self.teachers.find_by_id(teacher_id).await?.map(|t| t.id),
            None => None,
        };

        let mut users = Vec::with_capacity(requested_users.len());
        for user_id in requested_users {
            if users.contains(&user_id) {
                continue;
            }
            if self.users.find_by_id(user_id).await?.is_some() {
                users.push(user_id);
            }
        }

        Ok(Session {
            id,
            name,
            date,
            description,
            teacher_id,
            users,
            created_at: None,
            updated_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewUser;
    use crate::database::{seed_teacher, test_pool};
    use crate::repositories::session_repository::SessionRepository;
    use crate::repositories::user_repository::UserRepository;
    use crate::auth::models::AuthenticatedPrincipal;
    use crate::services::membership_service::MembershipService;
    use chrono::{TimeZone, Utc};

    fn payload(name: &str, teacher_id: i64, users: Vec<i64>) -> SessionDto {
        SessionDto {
            name: Some(name.to_string()),
            date: Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()),
            teacher_id: Some(teacher_id),
            users,
            description: Some("Morning vinyasa".to_string()),
            ..Default::default()
        }
    }

    async fn user(repo: &UserRepository<'_>, email: &str) -> i64 {
        repo.save(NewUser {
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
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let teacher = seed_teacher(&pool, "Margot", "Delahaye").await;
        let sessions = SessionRepository::new(&pool);
        let users = UserRepository::new(&pool);
        let teachers = TeacherRepository::new(&pool);
        let locks = SessionLocks::default();
        let service = SessionService::new(&sessions, &users, &teachers, &locks);

        let created = service
            .create(payload("Sunrise flow", teacher, vec![]))
            .await
            .unwrap();
        let id = created.id.unwrap();
        assert_eq!(created.teacher_id, Some(teacher));

        let found = service.find_by_id(id).await.unwrap();
        assert_eq!(found.name, "Sunrise flow");
        assert_eq!(service.find_all().await.unwrap().len(), 1);

        let missing = service.find_by_id(id + 1).await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_teacher_is_stored_as_none() {
        let pool = test_pool().await;
        let sessions = SessionRepository::new(&pool);
        let users = UserRepository::new(&pool);
        let teachers = TeacherRepository::new(&pool);
        let locks = SessionLocks::default();
        let service = SessionService::new(&sessions, &users, &teachers, &locks);

        let created = service.create(payload("Yin", 404, vec![])).await.unwrap();
        assert_eq!(created.teacher_id, None);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_rejected() {
        let pool = test_pool().await;
        let sessions = SessionRepository::new(&pool);
        let users = UserRepository::new(&pool);
        let teachers = TeacherRepository::new(&pool);
        let locks = SessionLocks::default();
        let service = SessionService::new(&sessions, &users, &teachers, &locks);

        let mut dto = payload("Yin", 1, vec![]);
        dto.description = None;

        let err = service.create(dto).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref message } if message.contains("description")));
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_filters_participants_and_keeps_path_id() {
        let pool = test_pool().await;
        let teacher = seed_teacher(&pool, "Margot", "Delahaye").await;
        let sessions = SessionRepository::new(&pool);
        let users = UserRepository::new(&pool);
        let teachers = TeacherRepository::new(&pool);
        let locks = SessionLocks::default();
        let service = SessionService::new(&sessions, &users, &teachers, &locks);

        let jane = user(&users, "jane@studio.com").await;
        let created = service
            .create(payload("Hatha", teacher, vec![]))
            .await
            .unwrap();
        let id = created.id.unwrap();

        let mut dto = payload("Hatha, slower", teacher, vec![jane, 999, jane]);
        dto.id = Some(id + 100);

        let updated = service.update(id, dto).await.unwrap();
        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.name, "Hatha, slower");
        assert_eq!(updated.users, vec![jane]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_session() {
        let pool = test_pool().await;
        let sessions = SessionRepository::new(&pool);
        let users = UserRepository::new(&pool);
        let teachers = TeacherRepository::new(&pool);
        let locks = SessionLocks::default();
        let service = SessionService::new(&sessions, &users, &teachers, &locks);

        let err = service.update(12, payload("Yin", 1, vec![])).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        let err = service.delete_if_exists(12).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        let created = service.create(payload("Yin", 1, vec![])).await.unwrap();
        let id = created.id.unwrap();
        service.delete_if_exists(id).await.unwrap();
        assert!(matches!(
            service.find_by_id(id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_and_join_on_shared_locks_both_apply() {
        let pool = test_pool().await;
        let teacher = seed_teacher(&pool, "Margot", "Delahaye").await;
        let sessions = SessionRepository::new(&pool);
        let users = UserRepository::new(&pool);
        let teachers = TeacherRepository::new(&pool);
        let locks = SessionLocks::default();
        let service = SessionService::new(&sessions, &users, &teachers, &locks);
        let membership = MembershipService::new(&sessions, &users, &locks);

        let jane = user(&users, "jane@studio.com").await;
        let mark = user(&users, "mark@studio.com").await;
        let id = service
            .create(payload("Hatha", teacher, vec![jane]))
            .await
            .unwrap()
            .id
            .unwrap();
        let actor: AuthenticatedPrincipal = users.find_by_id(mark).await.unwrap().unwrap().into();

        // update is polled first and holds the lock; the join queues behind it
        let (updated, joined) = tokio::join!(
            service.update(id, payload("Hatha, slower", teacher, vec![jane])),
            membership.join(&actor, id, mark)
        );
        updated.unwrap();
        joined.unwrap();

        let session = service.find_by_id(id).await.unwrap();
        assert_eq!(session.name, "Hatha, slower");
        assert_eq!(session.users, vec![jane, mark]);
    }
}
