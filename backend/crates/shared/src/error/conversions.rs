//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`].

use super::app_error::AppError;
use super::envelope::FieldError;
use super::kind::ErrorKind;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::Forbidden,
            _ => ErrorKind::InternalServerError,
        };
        AppError::new(kind, "I/O operation failed").with_source(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() {
            AppError::bad_request(format!("JSON parse error: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// 一意制約名からフィールド名を推定
///
/// PostgreSQL の制約名は `<table>_<column>_key` の形式です。
/// 例: `waitlist_entries_email_key` → `email`
#[cfg(feature = "sqlx")]
fn field_from_constraint(constraint: &str) -> Option<&str> {
    let stem = constraint.strip_suffix("_key")?;
    // 最後のセグメントをカラム名とみなす
    stem.rsplit('_').next().filter(|s| !s.is_empty())
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found").with_source(err),
            sqlx::Error::PoolTimedOut => {
                AppError::service_unavailable("Database connection pool exhausted").with_source(err)
            }
            sqlx::Error::Database(db_err) => {
                // PostgreSQL specific error codes
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let app_err = if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        // 23505: unique_violation — 衝突したカラムを封筒に載せる
                        "23505" => match db_err.constraint().and_then(field_from_constraint) {
                            Some(field) => AppError::duplicate(format!(
                                "A record with this {} already exists",
                                field
                            ))
                            .with_details(vec![FieldError::new(
                                field,
                                "Already exists",
                            )]),
                            None => AppError::duplicate("A record with this value already exists"),
                        },
                        // Class 23 — other integrity constraint violations
                        "23502" => AppError::bad_request("Required field is null"),
                        "23503" => AppError::duplicate("Foreign key violation"),
                        "23514" => AppError::bad_request("Check constraint violation"),
                        // Class 53 — Insufficient Resources
                        "53000" | "53100" | "53200" | "53300" => {
                            AppError::service_unavailable("Database resource exhausted")
                        }
                        // Class 57 — Operator Intervention
                        "57000" | "57014" | "57P01" | "57P02" | "57P03" => {
                            AppError::service_unavailable("Database unavailable")
                        }
                        _ => AppError::internal("Database error"),
                    }
                } else {
                    AppError::internal("Database error")
                };
                app_err.with_source(err)
            }
            sqlx::Error::Io(_) => {
                AppError::service_unavailable("Database connection error").with_source(err)
            }
            sqlx::Error::Protocol(_) => {
                AppError::internal("Database protocol error").with_source(err)
            }
            sqlx::Error::Tls(_) => AppError::internal("Database TLS error").with_source(err),
            _ => AppError::internal("Database error").with_source(err),
        }
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        use super::envelope::ErrorBody;

        // 5xx は完全なエラー連鎖をサーバーログへ。クライアントには固定文言のみ。
        if self.is_server_error() {
            tracing::error!(error = ?self, "Request failed with server error");
        }

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = ErrorBody::from_error(&self);

        let mut response = match self.retry_after() {
            Some(secs) => {
                (status, [("Retry-After", secs.to_string())], Json(body.clone())).into_response()
            }
            None => (status, Json(body.clone())).into_response(),
        };
        // 最外層のリクエストID ミドルウェアが requestId を差し込めるように
        // 封筒を extensions に残す
        response.extensions_mut().insert(body);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), ErrorKind::NotFound);

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_field_from_constraint() {
        assert_eq!(
            field_from_constraint("waitlist_entries_email_key"),
            Some("email")
        );
        assert_eq!(field_from_constraint("blog_posts_slug_key"), Some("slug"));
        assert_eq!(field_from_constraint("admins_email_key"), Some("email"));
        // _key で終わらない制約は推定しない
        assert_eq!(field_from_constraint("blog_posts_pkey"), None);
    }
}
