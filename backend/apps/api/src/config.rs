//! Environment-derived configuration
//!
//! Parsed once at startup; any violation is fatal. The process must
//! refuse to serve traffic with a missing database or a weak signing
//! secret rather than limp along misconfigured.

use std::time::Duration;

use platform::rate_limit::RateLimitConfig;
use thiserror::Error;

/// Minimum token-signing secret length in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// Default token lifetime: 7 days
const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 3600;

/// Default bcrypt cost
const DEFAULT_BCRYPT_COST: u32 = 12;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Object storage settings for the upload endpoint
#[derive(Debug, Clone)]
pub struct UploadsConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

/// Full API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub database_url: String,
    pub token_secret: Vec<u8>,
    pub token_ttl: Duration,
    pub frontend_origins: Vec<String>,
    pub login_rate: RateLimitConfig,
    pub form_rate: RateLimitConfig,
    pub bcrypt_cost: u32,
    pub uploads: Option<UploadsConfig>,
}

impl ApiConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through a lookup function (testable without
    /// mutating the process environment)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let token_secret = lookup("TOKEN_SECRET")
            .ok_or(ConfigError::Missing("TOKEN_SECRET"))?
            .into_bytes();
        if token_secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::Invalid {
                var: "TOKEN_SECRET",
                reason: format!(
                    "must be at least {} bytes (got {})",
                    MIN_SECRET_LENGTH,
                    token_secret.len()
                ),
            });
        }

        let port = parse_or("PORT", &lookup, 5000u16)?;
        let token_ttl_secs = parse_or("TOKEN_TTL_SECS", &lookup, DEFAULT_TOKEN_TTL_SECS)?;
        let bcrypt_cost = parse_or("BCRYPT_COST", &lookup, DEFAULT_BCRYPT_COST)?;

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let login_defaults = RateLimitConfig::login();
        let login_rate = RateLimitConfig::new(
            parse_or("LOGIN_RATE_MAX", &lookup, login_defaults.max_requests)?,
            parse_or(
                "LOGIN_RATE_WINDOW_SECS",
                &lookup,
                login_defaults.window.as_secs(),
            )?,
        );

        let form_defaults = RateLimitConfig::form();
        let form_rate = RateLimitConfig::new(
            parse_or("FORM_RATE_MAX", &lookup, form_defaults.max_requests)?,
            parse_or(
                "FORM_RATE_WINDOW_SECS",
                &lookup,
                form_defaults.window.as_secs(),
            )?,
        );

        let uploads = lookup("UPLOADS_URL").map(|endpoint| UploadsConfig {
            endpoint,
            api_key: lookup("UPLOADS_API_KEY"),
        });

        Ok(Self {
            port,
            database_url,
            token_secret,
            token_ttl: Duration::from_secs(token_ttl_secs),
            frontend_origins,
            login_rate,
            form_rate,
            bcrypt_cost,
            uploads,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
            var,
            reason: format!("could not parse '{}'", raw),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn minimal() -> HashMap<String, String> {
        env(&[
            ("DATABASE_URL", "postgres://localhost/agency"),
            (
                "TOKEN_SECRET",
                "0123456789abcdef0123456789abcdef-extra",
            ),
        ])
    }

    #[test]
    fn test_minimal_config_with_defaults() {
        let vars = minimal();
        let config = ApiConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.token_ttl, Duration::from_secs(7 * 24 * 3600));
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.login_rate.max_requests, 5);
        assert_eq!(config.form_rate.max_requests, 3);
        assert_eq!(config.frontend_origins, vec!["http://localhost:3000"]);
        assert!(config.uploads.is_none());
    }

    #[test]
    fn test_missing_database_url_is_fatal() {
        let vars = env(&[("TOKEN_SECRET", "0123456789abcdef0123456789abcdef")]);
        let err = ApiConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let vars = env(&[("DATABASE_URL", "postgres://localhost/agency")]);
        let err = ApiConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TOKEN_SECRET")));
    }

    #[test]
    fn test_short_secret_is_fatal() {
        let vars = env(&[
            ("DATABASE_URL", "postgres://localhost/agency"),
            ("TOKEN_SECRET", "too-short"),
        ]);
        let err = ApiConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "TOKEN_SECRET",
                ..
            }
        ));
    }

    #[test]
    fn test_overrides_and_origin_list() {
        let mut vars = minimal();
        vars.insert("PORT".to_string(), "8080".to_string());
        vars.insert("TOKEN_TTL_SECS".to_string(), "3600".to_string());
        vars.insert("LOGIN_RATE_MAX".to_string(), "10".to_string());
        vars.insert(
            "FRONTEND_ORIGINS".to_string(),
            "https://example.com, https://admin.example.com".to_string(),
        );
        vars.insert("UPLOADS_URL".to_string(), "https://assets.example.com/upload".to_string());

        let config = ApiConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.token_ttl, Duration::from_secs(3600));
        assert_eq!(config.login_rate.max_requests, 10);
        assert_eq!(
            config.frontend_origins,
            vec!["https://example.com", "https://admin.example.com"]
        );
        assert_eq!(
            config.uploads.unwrap().endpoint,
            "https://assets.example.com/upload"
        );
    }

    #[test]
    fn test_garbage_port_is_fatal() {
        let mut vars = minimal();
        vars.insert("PORT".to_string(), "not-a-port".to_string());
        let err = ApiConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }
}
