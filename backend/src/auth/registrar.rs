//! Account registration.

use tracing::info;

use crate::auth::models::{MessageResponse, SignupRequest};
use crate::database::models::NewUser;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::{UserStore, is_unique_violation};
use crate::utils::password::PasswordHasher;

/// Creates new user accounts.
pub struct Registrar<'a> {
    users: &'a dyn UserStore,
    hasher: &'a dyn PasswordHasher,
}

impl<'a> Registrar<'a> {
    pub fn new(users: &'a dyn UserStore, hasher: &'a dyn PasswordHasher) -> Self {
        Self { users, hasher }
    }

    /// Registers a new, non-admin user.
    ///
    /// # Errors
    /// Returns `ServiceError::DuplicateEmail` when the email is already taken,
    /// whether caught by the lookup or by the `UNIQUE` constraint on insert.
    pub async fn register(&self, request: SignupRequest) -> ServiceResult<MessageResponse> {
        if self.users.exists_by_email(&request.email).await? {
            return Err(ServiceError::duplicate_email(request.email));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let email = request.email.clone();

        let user = self
            .users
            .save(NewUser {
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                password_hash,
                admin: false,
            })
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ServiceError::duplicate_email(email)
                } else {
                    ServiceError::from(e)
                }
            })?;

        info!("Registered user {}", user.id);
        Ok(MessageResponse::new("User registered successfully!"))
    }
}
