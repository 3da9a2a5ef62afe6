//! Password Hashing and Verification
//!
//! bcrypt-backed password handling with:
//! - Tunable cost factor (default 12 rounds)
//! - Zeroization of sensitive data
//! - Constant-time comparison (inside bcrypt)
//! - Optional strength policy for password creation
//! - A per-process dummy hash so credential lookups that miss still
//!   pay the full verification cost (anti-enumeration)
//!
//! ## Security Features
//! - Work-factor hashing slows offline brute force
//! - Zeroization prevents memory inspection attacks
//! - Verification runs on a blocking thread so the async scheduler
//!   is never monopolized by hashing work

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::random_bytes;

// ============================================================================
// Constants
// ============================================================================

/// Default bcrypt cost factor (2^12 rounds)
pub const DEFAULT_COST: u32 = 12;

/// Minimum password length under the strength policy
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (bcrypt only reads the first 72 bytes)
pub const MAX_PASSWORD_LENGTH: usize = 72;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Missing an uppercase letter
    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    /// Missing a lowercase letter
    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    /// Missing a digit
    #[error("Password must contain at least one number")]
    MissingDigit,

    /// Missing a symbol
    #[error("Password must contain at least one special character")]
    MissingSymbol,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Strength Policy
// ============================================================================

/// Password strength policy applied when a password is *created*
/// (seed tooling, future password changes). Verification of existing
/// passwords never applies the policy.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum number of characters
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
        }
    }
}

impl PasswordPolicy {
    /// Collect every policy violation for the given input
    ///
    /// Returns an empty vector when the password satisfies the policy.
    pub fn violations(&self, raw: &str) -> Vec<PasswordPolicyError> {
        let mut violations = Vec::new();

        let char_count = raw.chars().count();
        if char_count < self.min_length {
            violations.push(PasswordPolicyError::TooShort {
                min: self.min_length,
                actual: char_count,
            });
        }
        if !raw.chars().any(|c| c.is_ascii_uppercase()) {
            violations.push(PasswordPolicyError::MissingUppercase);
        }
        if !raw.chars().any(|c| c.is_ascii_lowercase()) {
            violations.push(PasswordPolicyError::MissingLowercase);
        }
        if !raw.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PasswordPolicyError::MissingDigit);
        }
        if !raw.chars().any(|c| !c.is_ascii_alphanumeric()) {
            violations.push(PasswordPolicyError::MissingSymbol);
        }

        violations
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// This type ensures that password data is securely erased from memory
/// when the value is dropped, preventing memory inspection attacks.
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new password, enforcing the strength policy
    ///
    /// Used on the password-creation path (seeding, password change).
    /// Returns the first violation; use [`PasswordPolicy::violations`]
    /// for the full list.
    pub fn new(raw: String, policy: &PasswordPolicy) -> Result<Self, PasswordPolicyError> {
        if raw.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }
        if raw.len() > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: raw.len(),
            });
        }
        if let Some(violation) = policy.violations(&raw).into_iter().next() {
            return Err(violation);
        }
        Ok(Self(raw))
    }

    /// Create a password for verification against an existing hash
    ///
    /// The strength policy does not apply to login input; an admin whose
    /// password predates the policy must still be able to sign in.
    pub fn for_login(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }
        if raw.len() > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: raw.len(),
            });
        }
        Ok(Self(raw))
    }

    /// Get the password as bytes for hashing
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password with bcrypt at the given cost
    pub fn hash(&self, cost: u32) -> Result<HashedPassword, PasswordHashError> {
        let hash = bcrypt::hash(self.as_bytes(), cost)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
        Ok(HashedPassword { hash })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in bcrypt's modular crypt format
/// (`$2b$<cost>$<salt+digest>`).
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from a stored hash string (e.g., from the database)
    pub fn from_hash_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        // $2<version>$<cost>$<22 char salt + 31 char digest>
        let segments: Vec<&str> = hash.split('$').collect();
        let well_formed = segments.len() == 4
            && segments[0].is_empty()
            && segments[1].starts_with('2')
            && segments[2].parse::<u32>().is_ok()
            && segments[3].len() == 53;

        if !well_formed {
            return Err(PasswordHashError::InvalidHashFormat);
        }

        Ok(Self { hash })
    }

    /// Get the hash string for storage
    pub fn as_hash_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    ///
    /// bcrypt performs a constant-time comparison internally.
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        bcrypt::verify(password.as_bytes(), &self.hash).unwrap_or(false)
    }

    /// Check if the hash uses a lower cost than currently configured
    pub fn needs_rehash(&self, cost: u32) -> bool {
        self.hash
            .split('$')
            .nth(2)
            .and_then(|c| c.parse::<u32>().ok())
            .is_none_or(|stored| stored < cost)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Dummy hash (anti-enumeration)
// ============================================================================

/// Build the per-process dummy hash used when a credential lookup misses.
///
/// When no record matches an email, the caller still verifies the
/// presented password against this hash instead of short-circuiting, so
/// the unknown-email and wrong-password paths take indistinguishable
/// time. The hashed input is random; it matches no real password, and a
/// chance match would still fail the login (no record to log into).
///
/// Computed once at startup with the same cost as real hashes.
pub fn dummy_hash(cost: u32) -> Result<HashedPassword, PasswordHashError> {
    let nonce = random_bytes(32);
    let hash = bcrypt::hash(&nonce, cost)
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
    Ok(HashedPassword { hash })
}

// ============================================================================
// Async variants (off the event loop)
// ============================================================================

/// Hash on a blocking thread
///
/// bcrypt at cost 12 takes hundreds of milliseconds of pure CPU;
/// running it inline would stall every other in-flight request.
pub async fn hash_async(
    password: ClearTextPassword,
    cost: u32,
) -> Result<HashedPassword, PasswordHashError> {
    tokio::task::spawn_blocking(move || password.hash(cost))
        .await
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
}

/// Verify on a blocking thread
pub async fn verify_async(
    password: ClearTextPassword,
    hash: HashedPassword,
) -> Result<bool, PasswordHashError> {
    tokio::task::spawn_blocking(move || hash.verify(&password))
        .await
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Cost 4 is the bcrypt minimum; keeps the test suite fast
    const TEST_COST: u32 = 4;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::default()
    }

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("Ab1!".to_string(), &policy());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_password_too_long() {
        let long_password = format!("Aa1!{}", "a".repeat(MAX_PASSWORD_LENGTH));
        let result = ClearTextPassword::new(long_password, &policy());
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_empty() {
        let result = ClearTextPassword::new("".to_string(), &policy());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_policy_violations_collected() {
        let violations = policy().violations("alllowercase");
        assert!(violations.contains(&PasswordPolicyError::MissingUppercase));
        assert!(violations.contains(&PasswordPolicyError::MissingDigit));
        assert!(violations.contains(&PasswordPolicyError::MissingSymbol));
        assert!(!violations.contains(&PasswordPolicyError::MissingLowercase));
    }

    #[test]
    fn test_policy_satisfied() {
        assert!(policy().violations("MySecure#Pass2024!").is_empty());
    }

    #[test]
    fn test_login_password_skips_policy() {
        // Weak but existing passwords must still be able to log in
        let result = ClearTextPassword::for_login("weakpass".to_string());
        assert!(result.is_ok());

        let result = ClearTextPassword::for_login("".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_hash_and_verify() {
        let password =
            ClearTextPassword::new("TestPassword123!".to_string(), &policy()).unwrap();
        let hashed = password.hash(TEST_COST).unwrap();

        // Correct password should verify
        assert!(hashed.verify(&password));

        // Wrong password should not verify
        let wrong = ClearTextPassword::for_login("WrongPassword123!".to_string()).unwrap();
        assert!(!hashed.verify(&wrong));
    }

    #[test]
    fn test_hash_string_roundtrip() {
        let password =
            ClearTextPassword::new("TestPassword123!".to_string(), &policy()).unwrap();
        let hashed = password.hash(TEST_COST).unwrap();

        let stored = hashed.as_hash_string().to_string();
        let restored = HashedPassword::from_hash_string(stored).unwrap();

        assert!(restored.verify(&password));
    }

    #[test]
    fn test_invalid_hash_string() {
        assert!(HashedPassword::from_hash_string("not_a_valid_hash").is_err());
        assert!(HashedPassword::from_hash_string("$2b$12$short").is_err());
        assert!(HashedPassword::from_hash_string("").is_err());
    }

    #[test]
    fn test_needs_rehash() {
        let password =
            ClearTextPassword::new("TestPassword123!".to_string(), &policy()).unwrap();
        let hashed = password.hash(TEST_COST).unwrap();
        assert!(hashed.needs_rehash(TEST_COST + 1));
        assert!(!hashed.needs_rehash(TEST_COST));
    }

    #[test]
    fn test_dummy_hash_is_well_formed() {
        let dummy = dummy_hash(TEST_COST).unwrap();
        assert!(HashedPassword::from_hash_string(dummy.as_hash_string()).is_ok());

        // No real password should match it
        let password = ClearTextPassword::for_login("AnyPassword123!".to_string()).unwrap();
        assert!(!dummy.verify(&password));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::for_login("secretvalue".to_string()).unwrap();
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secretvalue"));

        let hashed = password.hash(TEST_COST).unwrap();
        let debug_output = format!("{:?}", hashed);
        assert!(!debug_output.contains("$2"));
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let password = ClearTextPassword::for_login("TestPassword123!".to_string()).unwrap();
        let hashed = hash_async(
            ClearTextPassword::for_login("TestPassword123!".to_string()).unwrap(),
            TEST_COST,
        )
        .await
        .unwrap();

        let ok = verify_async(password, hashed).await.unwrap();
        assert!(ok);
    }
}
