//! One-way password hashing.

use bcrypt::{hash, verify};

use crate::errors::{ServiceError, ServiceResult};

/// Hashes plaintext passwords and checks them against stored hashes.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> ServiceResult<String>;

    /// `Ok(false)` on mismatch, `Err` only if the stored hash is unusable.
    fn verify(&self, plaintext: &str, hash: &str) -> ServiceResult<bool>;
}

/// bcrypt-backed hasher.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> ServiceResult<String> {
        hash(plaintext, self.cost)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> ServiceResult<bool> {
        verify(plaintext, hash).map_err(|e| {
            ServiceError::internal_error(format!("Password verification failed: {}", e))
        })
    }
}
