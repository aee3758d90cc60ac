//! Session membership: users joining and leaving yoga sessions.
//!
//! Per (session, user) pair the state is either "member" or "not member".
//! `join` and `leave` are strict: joining twice or leaving a session one is
//! not part of is rejected rather than treated as a no-op.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::info;

use crate::auth::models::AuthenticatedPrincipal;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::{
    SessionStore, UserStore, is_foreign_key_violation, is_unique_violation,
};

/// Per-session locks serializing writers of a session within one process.
///
/// Held by `join`/`leave` and by session update and delete. Across processes
/// the single-row writes on `participate` and its primary key keep
/// participant ids unique.
#[derive(Clone, Default)]
pub struct SessionLocks {
    locks: Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>,
}

impl SessionLocks {
    /// Wait for exclusive access to `session_id`.
    pub async fn acquire(&self, session_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // drop entries nobody holds or waits for
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(session_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap().len()
    }
}

/// Service layer for session membership.
pub struct MembershipService<'a> {
    sessions: &'a dyn SessionStore,
    users: &'a dyn UserStore,
    locks: &'a SessionLocks,
}

impl<'a> MembershipService<'a> {
    pub fn new(
        sessions: &'a dyn SessionStore,
        users: &'a dyn UserStore,
        locks: &'a SessionLocks,
    ) -> Self {
        Self {
            sessions,
            users,
            locks,
        }
    }

    /// Adds `user_id` to the participants of `session_id`.
    ///
    /// # Errors
    /// * `NotFound` if the session or the user does not exist
    /// * `AlreadyMember` if the user already participates
    pub async fn join(
        &self,
        actor: &AuthenticatedPrincipal,
        session_id: i64,
        user_id: i64,
    ) -> ServiceResult<()> {
        let _guard = self.locks.acquire(session_id).await;

        let session = self.sessions.find_by_id(session_id).await?;
        let user = self.users.find_by_id(user_id).await?;

        let session = match (session, user) {
            (Some(session), Some(_)) => session,
            (None, _) => return Err(ServiceError::not_found("Session", session_id)),
            (_, None) => return Err(ServiceError::not_found("User", user_id)),
        };

        if session.has_participant(user_id) {
            return Err(ServiceError::AlreadyMember {
                session_id,
                user_id,
            });
        }

        // Another process may have joined since the read; the primary key
        // on `participate` settles it.
        if let Err(e) = self.sessions.add_participant(session_id, user_id).await {
            if is_unique_violation(&e) {
                return Err(ServiceError::AlreadyMember {
                    session_id,
                    user_id,
                });
            }
            if is_foreign_key_violation(&e) {
                // session or user deleted since the read
                return Err(match self.users.find_by_id(user_id).await? {
                    Some(_) => ServiceError::not_found("Session", session_id),
                    None => ServiceError::not_found("User", user_id),
                });
            }
            return Err(e.into());
        }

        info!(
            "User {} joined session {} (requested by {})",
            user_id, session_id, actor.id
        );
        Ok(())
    }

    /// Removes `user_id` from the participants of `session_id`.
    ///
    /// The user itself is not looked up; only list membership matters.
    ///
    /// # Errors
    /// * `NotFound` if the session does not exist
    /// * `NotMember` if the user does not participate
    pub async fn leave(
        &self,
        actor: &AuthenticatedPrincipal,
        session_id: i64,
        user_id: i64,
    ) -> ServiceResult<()> {
        let _guard = self.locks.acquire(session_id).await;

        if self.sessions.find_by_id(session_id).await?.is_none() {
            return Err(ServiceError::not_found("Session", session_id));
        }

        if !self.sessions.remove_participant(session_id, user_id).await? {
            return Err(ServiceError::NotMember {
                session_id,
                user_id,
            });
        }

        info!(
            "User {} left session {} (requested by {})",
            user_id, session_id, actor.id
        );
        Ok(())
    }
}
