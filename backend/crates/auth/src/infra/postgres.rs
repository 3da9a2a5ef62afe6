//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use platform::rate_limit::{RateLimitConfig, RateLimitResult, RateLimitStore};
use sqlx::PgPool;

use crate::domain::entity::admin::Admin;
use crate::domain::repository::AdminRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed administrator repository
///
/// Also implements the rate-limit store: the login limiter shares the
/// process-wide `rate_limits` table so the connection pool stays the
/// only shared resource across requests.
#[derive(Clone)]
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete rate-limit windows that ended more than an hour ago
    pub async fn sweep_stale_rate_limits(&self) -> AuthResult<u64> {
        let cutoff_ms = Utc::now().timestamp_millis() - 3600_000;

        let deleted = sqlx::query("DELETE FROM rate_limits WHERE window_start_ms < $1")
            .bind(cutoff_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(windows_deleted = deleted, "Swept stale rate-limit windows");

        Ok(deleted)
    }
}

// ============================================================================
// Admin Repository Implementation
// ============================================================================

impl AdminRepository for PgAdminRepository {
    async fn create(&self, admin: &Admin) -> AuthResult<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO admins (
                email,
                password_hash,
                display_name,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO UPDATE SET
                password_hash = EXCLUDED.password_hash,
                display_name = EXCLUDED.display_name,
                updated_at = EXCLUDED.updated_at
            RETURNING id
            "#,
        )
        .bind(admin.email.as_str())
        .bind(admin.password_hash.as_hash_string())
        .bind(&admin.display_name)
        .bind(admin.last_login_at)
        .bind(admin.created_at)
        .bind(admin.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT
                id,
                email,
                password_hash,
                display_name,
                last_login_at,
                created_at,
                updated_at
            FROM admins
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_admin()).transpose()
    }

    async fn find_by_id(&self, id: i64) -> AuthResult<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT
                id,
                email,
                password_hash,
                display_name,
                last_login_at,
                created_at,
                updated_at
            FROM admins
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_admin()).transpose()
    }

    async fn update_last_login(&self, id: i64, at: DateTime<Utc>) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE admins
            SET last_login_at = $2, updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Rate Limit Store Implementation
// ============================================================================

impl RateLimitStore for PgAdminRepository {
    async fn check_and_increment(
        &self,
        scope: &str,
        key: &[u8],
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        let now_ms = Utc::now().timestamp_millis();
        let window_start = config.window_start(now_ms);

        let row = sqlx::query_as::<_, (i32,)>(
            r#"
            INSERT INTO rate_limits (scope, client_key, window_start_ms, request_count)
            VALUES ($1, $2, $3, 1)
            ON CONFLICT (scope, client_key, window_start_ms)
            DO UPDATE SET request_count = rate_limits.request_count + 1
            RETURNING request_count
            "#,
        )
        .bind(scope)
        .bind(key)
        .bind(window_start)
        .fetch_one(&self.pool)
        .await?;

        let count = row.0 as u32;
        let allowed = count <= config.max_requests;

        if !allowed {
            tracing::warn!(scope = scope, count = count, max = config.max_requests, "Rate limit exceeded");
        }

        Ok(RateLimitResult {
            allowed,
            remaining: config.max_requests.saturating_sub(count),
            reset_at_ms: window_start + config.window_ms(),
        })
    }
}

// ============================================================================
// Row mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AdminRow {
    id: i64,
    email: String,
    password_hash: String,
    display_name: Option<String>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdminRow {
    fn into_admin(self) -> AuthResult<Admin> {
        let password_hash = HashedPassword::from_hash_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Corrupt stored hash: {e}")))?;

        Ok(Admin {
            id: self.id,
            email: Email::from_db(self.email),
            password_hash,
            display_name: self.display_name,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
