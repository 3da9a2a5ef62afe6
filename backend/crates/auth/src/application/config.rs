//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::password::{self, HashedPassword, PasswordHashError};
use platform::rate_limit::RateLimitConfig;
use thiserror::Error;

/// Minimum length of the token-signing secret in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// Default token lifetime (7 days)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Configuration errors are fatal: the process must refuse to serve
/// traffic rather than run with a weak secret.
#[derive(Debug, Error)]
pub enum AuthConfigError {
    #[error("Token secret must be at least {min} bytes (got {actual})")]
    SecretTooShort { min: usize, actual: usize },

    #[error(transparent)]
    Hashing(#[from] PasswordHashError),
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for token signing (≥ 32 bytes)
    pub token_secret: Vec<u8>,
    /// Token lifetime
    pub token_ttl: Duration,
    /// Issuer claim stamped into every token
    pub issuer: String,
    /// bcrypt cost factor
    pub bcrypt_cost: u32,
    /// Login rate limit (per client IP)
    pub login_rate_limit: RateLimitConfig,
    /// Per-process dummy hash for lookup misses (anti-enumeration)
    dummy_hash: HashedPassword,
}

impl AuthConfig {
    /// Build a config, validating the secret and precomputing the
    /// dummy hash at the configured cost so miss-path verification
    /// costs the same as a real one.
    pub fn new(
        token_secret: Vec<u8>,
        token_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Result<Self, AuthConfigError> {
        if token_secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthConfigError::SecretTooShort {
                min: MIN_SECRET_LENGTH,
                actual: token_secret.len(),
            });
        }

        let dummy_hash = password::dummy_hash(bcrypt_cost)?;

        Ok(Self {
            token_secret,
            token_ttl,
            issuer: "agency-api".to_string(),
            bcrypt_cost,
            login_rate_limit: RateLimitConfig::login(),
            dummy_hash,
        })
    }

    /// Create config with a random secret (development and tests)
    pub fn with_random_secret(bcrypt_cost: u32) -> Self {
        Self::new(
            platform::crypto::random_bytes(MIN_SECRET_LENGTH),
            DEFAULT_TOKEN_TTL,
            bcrypt_cost,
        )
        .expect("random secret satisfies the length requirement")
    }

    /// Override the login rate limit
    pub fn with_login_rate_limit(mut self, limit: RateLimitConfig) -> Self {
        self.login_rate_limit = limit;
        self
    }

    /// Override the issuer claim
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Token lifetime in whole seconds
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl.as_secs() as i64
    }

    /// The per-process dummy hash
    pub fn dummy_hash(&self) -> &HashedPassword {
        &self.dummy_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_is_rejected() {
        let result = AuthConfig::new(vec![0u8; MIN_SECRET_LENGTH - 1], DEFAULT_TOKEN_TTL, 4);
        assert!(matches!(
            result,
            Err(AuthConfigError::SecretTooShort { actual: 31, .. })
        ));
    }

    #[test]
    fn test_exact_length_secret_is_accepted() {
        let config = AuthConfig::new(vec![0u8; MIN_SECRET_LENGTH], DEFAULT_TOKEN_TTL, 4).unwrap();
        assert_eq!(config.token_ttl_secs(), 7 * 24 * 3600);
        assert_eq!(config.login_rate_limit.max_requests, 5);
    }

    #[test]
    fn test_dummy_hash_matches_configured_cost() {
        let config = AuthConfig::with_random_secret(4);
        // The dummy must not be cheaper to verify than a real hash
        assert!(!config.dummy_hash().needs_rehash(4));
    }
}
