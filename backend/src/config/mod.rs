//! Studio backend configuration, read once from the environment at startup.
//!
//! Settings are grouped by the part of the service that consumes them: the
//! SQLite pool, token issuance and password hashing, and the HTTP listener.
//! A `.env` file in the working directory is honoured.

use anyhow::{Context, Result, bail};
use std::env;
use std::str::FromStr;

/// Upper bound for `JWT_EXPIRES_IN_SECONDS`: one year.
pub const MAX_TOKEN_LIFETIME_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for HS256 tokens; never logged.
    pub jwt_secret: String,
    pub token_lifetime_seconds: u64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server_port: u16,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// `DATABASE_URL` and `JWT_SECRET` are required; everything else has a
    /// default.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").context("DATABASE_URL not set")?,
            max_connections: var_or("DB_MAX_CONNECTIONS", 5)?,
            acquire_timeout_seconds: var_or("DB_ACQUIRE_TIMEOUT_SECONDS", 3)?,
        };

        let auth = AuthConfig {
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET not set")?,
            token_lifetime_seconds: var_or("JWT_EXPIRES_IN_SECONDS", 86_400)?,
            bcrypt_cost: var_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        };
        auth.check()?;

        Ok(Config {
            database,
            auth,
            server_port: var_or("SERVER_PORT", 3000)?,
        })
    }
}

impl AuthConfig {
    fn check(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }
        if !(1..=MAX_TOKEN_LIFETIME_SECONDS).contains(&self.token_lifetime_seconds) {
            bail!(
                "JWT_EXPIRES_IN_SECONDS must be between 1 and {}",
                MAX_TOKEN_LIFETIME_SECONDS
            );
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31");
        }
        Ok(())
    }
}

/// Parses `key` if set, otherwise returns `default`.
fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(secret: &str, lifetime: u64, cost: u32) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            token_lifetime_seconds: lifetime,
            bcrypt_cost: cost,
        }
    }

    #[test]
    fn test_auth_settings_bounds() {
        assert!(auth("secret", 86_400, 10).check().is_ok());
        assert!(auth("secret", MAX_TOKEN_LIFETIME_SECONDS, 4).check().is_ok());

        assert!(auth("", 86_400, 10).check().is_err());
        assert!(auth("secret", 0, 10).check().is_err());
        assert!(auth("secret", MAX_TOKEN_LIFETIME_SECONDS + 1, 10).check().is_err());
        assert!(auth("secret", u64::MAX, 10).check().is_err());
        assert!(auth("secret", 86_400, 3).check().is_err());
    }

    #[test]
    fn test_unset_variable_falls_back_to_default() {
        let port: u16 = var_or("STUDIO_TEST_UNSET_VARIABLE", 3000).unwrap();
        assert_eq!(port, 3000);
    }
}
