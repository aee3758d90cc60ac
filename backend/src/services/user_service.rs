//! User business logic service.
//!
//! Lookup and deletion of registered accounts. Registration lives in
//! `auth::registrar`.

use tracing::info;

use crate::auth::guard::{Action, authorize};
use crate::auth::models::AuthenticatedPrincipal;
use crate::database::models::UserDto;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::UserStore;

pub struct UserService<'a> {
    users: &'a dyn UserStore,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `users` - Store holding the user records
    pub fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    /// Retrieves a user by ID with existence verification.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if user doesn't exist
    pub async fn find_by_id(&self, id: i64) -> ServiceResult<UserDto> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(user.into())
    }

    /// Deletes account `id` if `principal` owns it.
    ///
    /// # Errors
    /// * `NotFound` if the account does not exist
    /// * `PermissionDenied` if the principal is not the owner, admins included
    pub async fn delete_if_owner(
        &self,
        id: i64,
        principal: &AuthenticatedPrincipal,
    ) -> ServiceResult<()> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;

        authorize(
            principal,
            Action::DeleteAccount {
                owner_email: &user.email,
            },
        )
        .into_result()?;

        self.users.delete_by_id(user.id).await?;

        info!("User {} deleted their account", user.id);
        Ok(())
    }

    /// Lists every account. Administrators only.
    pub async fn find_all(&self, principal: &AuthenticatedPrincipal) -> ServiceResult<Vec<UserDto>> {
        authorize(principal, Action::Administer).into_result()?;

        let users = self.users.find_all().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }
}
