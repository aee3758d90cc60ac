//! JWT token utilities for authentication.
//!
//! Provides token creation and validation for the bearer tokens handed out at
//! login. A token only binds the subject email and its validity window; it
//! carries no role claim, so every privileged decision re-reads the user from
//! the store.

use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};
use crate::utils::clock::{Clock, SystemClock};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject email
    pub sub: String,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
}

/// Issues and validates signed, time-limited bearer tokens.
///
/// Built once at startup and shared read-only between requests.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(secret: &str, expires_in_seconds: u64, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        // Expiry is checked against the injected clock in `validate`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        TokenCodec {
            encoding_key,
            decoding_key,
            validation,
            expires_in_seconds,
            clock,
        }
    }

    /// Create a codec with the configured secret and validity, on the wall clock
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.auth.jwt_secret,
            config.auth.token_lifetime_seconds,
            Arc::new(SystemClock),
        )
    }

    /// Validity window of issued tokens, in seconds
    pub fn expires_in(&self) -> u64 {
        self.expires_in_seconds
    }

    /// Generate a new token for `email`
    pub fn issue(&self, email: &str) -> ServiceResult<String> {
        let now = self.clock.now();
        let exp = i64::try_from(self.expires_in_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                ServiceError::internal_error(format!(
                    "Token lifetime of {}s is out of range",
                    self.expires_in_seconds
                ))
            })?;

        let claims = Claims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate a token and return the subject email it was issued for
    pub fn validate(&self, token: &str) -> ServiceResult<String> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                ServiceError::AuthenticationFailed
            })?;

        if self.clock.now().timestamp() >= claims.exp {
            debug!("Token for {} expired", claims.sub);
            return Err(ServiceError::AuthenticationFailed);
        }

        Ok(claims.sub)
    }
}
