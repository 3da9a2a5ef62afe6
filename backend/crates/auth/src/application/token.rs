//! Token Service
//!
//! Issues and verifies the stateless bearer tokens (HS256 JWTs) that
//! carry the administrator identity between requests. There is no
//! revocation list; expiry is the only invalidation, and rotating the
//! signing secret invalidates every outstanding token at once.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Claims embedded in every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Administrator id (JWT subject, stringly per convention)
    pub sub: String,
    /// Administrator email
    pub email: String,
    /// Issuer
    pub iss: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject back into an administrator id
    pub fn admin_id(&self) -> Result<i64, TokenError> {
        self.sub.parse::<i64>().map_err(|_| TokenError::Invalid)
    }
}

/// Token verification failures
///
/// Expired and invalid are distinct kinds: the middleware presents
/// "please login again" for the former and logs the latter as a
/// possible tampering attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,
    #[error("Token is malformed or its signature does not verify")]
    Invalid,
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Invalid => AuthError::TokenInvalid,
        }
    }
}

/// Issues and verifies bearer tokens
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(&config.token_secret),
            decoding: DecodingKey::from_secret(&config.token_secret),
            issuer: config.issuer.clone(),
            ttl_secs: config.token_ttl_secs(),
        }
    }

    /// Issue a token for the given administrator
    pub fn issue(&self, admin_id: i64, email: &str) -> AuthResult<String> {
        self.issue_at(admin_id, email, Utc::now().timestamp())
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {e}")))
    }

    /// Issue with an explicit clock (exercised directly by tests)
    pub(crate) fn issue_at(
        &self,
        admin_id: i64,
        email: &str,
        now: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: admin_id.to_string(),
            email: email.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify with an explicit clock
    ///
    /// Signature and structure are checked first; only a token that
    /// verified cryptographically can be reported as expired. Expiry is
    /// a manual boundary check: `now >= exp` fails, one second earlier
    /// passes.
    pub(crate) fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        // Expiry is enforced below with exact boundary semantics
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                // Cannot occur with validate_exp off, but keep the
                // mapping honest if the validation set-up ever changes
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        if now >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    fn service() -> TokenService {
        TokenService::new(&AuthConfig::with_random_secret(TEST_COST))
    }

    #[test]
    fn test_round_trip() {
        let service = service();
        let token = service.issue_at(7, "admin@example.com", 1_700_000_000).unwrap();
        let claims = service.verify_at(&token, 1_700_000_000).unwrap();

        assert_eq!(claims.admin_id().unwrap(), 7);
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_000 + 7 * 24 * 3600);
    }

    #[test]
    fn test_expiry_boundary() {
        let service = service();
        let issued = 1_700_000_000;
        let expiry = issued + 7 * 24 * 3600;
        let token = service.issue_at(1, "admin@example.com", issued).unwrap();

        // One second before expiry: valid
        assert!(service.verify_at(&token, expiry - 1).is_ok());
        // Exactly at the expiry instant: expired, not invalid
        assert_eq!(service.verify_at(&token, expiry), Err(TokenError::Expired));
        assert_eq!(
            service.verify_at(&token, expiry + 1),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let service = service();
        let token = service.issue_at(1, "admin@example.com", 1_700_000_000).unwrap();

        // Flip one character in the signature segment
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        let sig = parts[2].clone();
        let flipped = if sig.ends_with('A') { 'B' } else { 'A' };
        parts[2] = format!("{}{}", &sig[..sig.len() - 1], flipped);
        let tampered = parts.join(".");

        assert_eq!(
            service.verify_at(&tampered, 1_700_000_000),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let service = service();
        let token = service.issue_at(1, "admin@example.com", 1_700_000_000).unwrap();

        // Swap the payload for one claiming a different subject
        let other = service.issue_at(2, "other@example.com", 1_700_000_000).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let other_payload: Vec<&str> = other.split('.').collect();
        parts[1] = other_payload[1];
        let spliced = parts.join(".");

        assert_eq!(
            service.verify_at(&spliced, 1_700_000_000),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_garbage_is_invalid_not_expired() {
        let service = service();
        assert_eq!(
            service.verify_at("not-even-a-jwt", 1_700_000_000),
            Err(TokenError::Invalid)
        );
        assert_eq!(
            service.verify_at("", 1_700_000_000),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_other_secret_is_invalid() {
        // Rotating the secret invalidates every outstanding token
        let issued_by = service();
        let verified_by = service();
        let token = issued_by.issue_at(1, "admin@example.com", 1_700_000_000).unwrap();
        assert_eq!(
            verified_by.verify_at(&token, 1_700_000_000),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_wrong_issuer_is_invalid() {
        let config = AuthConfig::with_random_secret(TEST_COST);
        let issuing = TokenService::new(&config.clone().with_issuer("someone-else"));
        let verifying = TokenService::new(&config);

        let token = issuing.issue_at(1, "admin@example.com", 1_700_000_000).unwrap();
        assert_eq!(
            verifying.verify_at(&token, 1_700_000_000),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let claims = Claims {
            sub: "abc".to_string(),
            email: "admin@example.com".to_string(),
            iss: "agency-api".to_string(),
            iat: 0,
            exp: 1,
        };
        assert_eq!(claims.admin_id(), Err(TokenError::Invalid));
    }
}
