//! Core business logic for the authentication system.

use tracing::{debug, error, info, warn};

use crate::auth::models::*;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::UserStore;
use crate::utils::jwt::TokenCodec;
use crate::utils::password::PasswordHasher;

/// Authentication service for handling login and bearer-token resolution
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    hasher: &'a dyn PasswordHasher,
    tokens: &'a TokenCodec,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(
        users: &'a dyn UserStore,
        hasher: &'a dyn PasswordHasher,
        tokens: &'a TokenCodec,
    ) -> Self {
        AuthService {
            users,
            hasher,
            tokens,
        }
    }

    /// Verify email and password, then issue a token.
    ///
    /// Unknown email and wrong password both yield `AuthenticationFailed`.
    pub async fn login(&self, login_request: LoginRequest) -> ServiceResult<JwtResponse> {
        let LoginRequest { email, password } = login_request;

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                info!("Login rejected: unknown credentials");
                return Err(ServiceError::AuthenticationFailed);
            }
        };

        let verified = self.hasher.verify(&password, &user.password).unwrap_or_else(|e| {
            error!("Stored password hash for user {} is unusable: {}", user.id, e);
            false
        });
        if !verified {
            info!("Login rejected: unknown credentials");
            return Err(ServiceError::AuthenticationFailed);
        }

        let token = self.tokens.issue(&user.email)?;

        // Admin flag is re-read at decision time; a user deleted in between
        // still gets the token, without admin rights.
        let admin = match self.users.find_by_email(&user.email).await {
            Ok(Some(current)) => current.admin,
            Ok(None) => false,
            Err(e) => {
                warn!("Could not re-read admin flag for user {}: {}", user.id, e);
                false
            }
        };

        info!("User {} logged in", user.id);

        Ok(JwtResponse {
            token,
            token_type: "Bearer".to_string(),
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            admin,
            expires_in: self.tokens.expires_in(),
        })
    }

    /// Resolve the caller behind a bearer token.
    ///
    /// The user is loaded from the store on every call, so a deleted account
    /// or a changed admin flag takes effect immediately.
    pub async fn authenticate(&self, token: &str) -> ServiceResult<AuthenticatedPrincipal> {
        let email = self.tokens.validate(token)?;

        match self.users.find_by_email(&email).await? {
            Some(user) => Ok(AuthenticatedPrincipal::from(user)),
            None => {
                debug!("Token subject no longer exists");
                Err(ServiceError::AuthenticationFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::registrar::Registrar;
    use crate::database::test_pool;
    use crate::repositories::user_repository::UserRepository;
    use crate::utils::clock::ManualClock;
    use crate::utils::password::BcryptHasher;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    fn signup(email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            first_name: "J".to_string(),
            last_name: "D".to_string(),
            password: password.to_string(),
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);
        let hasher = BcryptHasher::new(4);
        let tokens = TokenCodec::new("secret", 86_400, Arc::new(ManualClock::new(Utc::now())));

        Registrar::new(&users, &hasher)
            .register(signup("a@a.com", "pw"))
            .await
            .unwrap();

        let service = AuthService::new(&users, &hasher, &tokens);
        let response = service.login(login("a@a.com", "pw")).await.unwrap();

        assert_eq!(response.email, "a@a.com");
        assert_eq!(response.token_type, "Bearer");
        assert!(!response.admin);
        assert_eq!(tokens.validate(&response.token).unwrap(), "a@a.com");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);
        let hasher = BcryptHasher::new(4);
        let tokens = TokenCodec::new("secret", 86_400, Arc::new(ManualClock::new(Utc::now())));
        Registrar::new(&users, &hasher)
            .register(signup("a@a.com", "pw"))
            .await
            .unwrap();

        let service = AuthService::new(&users, &hasher, &tokens);
        let wrong = service.login(login("a@a.com", "wrong")).await.unwrap_err();
        let unknown = service.login(login("b@b.com", "pw")).await.unwrap_err();

        assert!(matches!(wrong, ServiceError::AuthenticationFailed));
        assert!(matches!(unknown, ServiceError::AuthenticationFailed));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_login_reports_admin_flag_from_store() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);
        let hasher = BcryptHasher::new(4);
        let tokens = TokenCodec::new("secret", 86_400, Arc::new(ManualClock::new(Utc::now())));
        Registrar::new(&users, &hasher)
            .register(signup("boss@studio.com", "pw"))
            .await
            .unwrap();
        sqlx::query("UPDATE users SET admin = 1 WHERE email = ?")
            .bind("boss@studio.com")
            .execute(&pool)
            .await
            .unwrap();

        let service = AuthService::new(&users, &hasher, &tokens);
        let response = service.login(login("boss@studio.com", "pw")).await.unwrap();
        assert!(response.admin);
    }

    #[tokio::test]
    async fn test_authenticate_resolves_fresh_principal() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);
        let hasher = BcryptHasher::new(4);
        let tokens = TokenCodec::new("secret", 86_400, Arc::new(ManualClock::new(Utc::now())));
        Registrar::new(&users, &hasher)
            .register(signup("a@a.com", "pw"))
            .await
            .unwrap();

        let service = AuthService::new(&users, &hasher, &tokens);
        let token = service.login(login("a@a.com", "pw")).await.unwrap().token;

        let principal = service.authenticate(&token).await.unwrap();
        assert_eq!(principal.email, "a@a.com");
        assert_eq!(principal.role, Role::Regular);

        // promotion after issuance is visible without a new token
        sqlx::query("UPDATE users SET admin = 1 WHERE email = ?")
            .bind("a@a.com")
            .execute(&pool)
            .await
            .unwrap();
        assert!(service.authenticate(&token).await.unwrap().is_admin());
    }

    #[tokio::test]
    async fn test_token_of_deleted_user_is_rejected() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);
        let hasher = BcryptHasher::new(4);
        let tokens = TokenCodec::new("secret", 86_400, Arc::new(ManualClock::new(Utc::now())));
        Registrar::new(&users, &hasher)
            .register(signup("a@a.com", "pw"))
            .await
            .unwrap();

        let service = AuthService::new(&users, &hasher, &tokens);
        let response = service.login(login("a@a.com", "pw")).await.unwrap();
        users.delete_by_id(response.id).await.unwrap();

        assert!(matches!(
            service.authenticate(&response.token).await,
            Err(ServiceError::AuthenticationFailed)
        ));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);
        let hasher = BcryptHasher::new(4);
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let tokens = TokenCodec::new("secret", 60, clock.clone());
        Registrar::new(&users, &hasher)
            .register(signup("a@a.com", "pw"))
            .await
            .unwrap();

        let service = AuthService::new(&users, &hasher, &tokens);
        let token = service.login(login("a@a.com", "pw")).await.unwrap().token;

        clock.advance(Duration::seconds(61));
        assert!(matches!(
            service.authenticate(&token).await,
            Err(ServiceError::AuthenticationFailed)
        ));
    }
}
