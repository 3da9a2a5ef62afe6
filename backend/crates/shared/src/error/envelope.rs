//! Response Envelope - Uniform JSON body shapes
//!
//! Every response leaves the API in exactly one of two shapes:
//! `{"success": true, "data": ...}` or
//! `{"success": false, "error": ..., "code": ...}`.

use serde::Serialize;

use super::app_error::AppError;

/// フィールド単位の検証エラー
///
/// 422 レスポンスの `details` 配列の要素です。
///
/// ## Examples
/// ```rust
/// use kernel::error::envelope::FieldError;
/// let err = FieldError::new("email", "Invalid email format");
/// assert_eq!(err.field, "email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// 対象フィールドのパス
    pub field: String,
    /// ユーザー向けメッセージ
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 成功レスポンスの統一封筒
///
/// ## Examples
/// ```rust
/// use kernel::error::envelope::ApiResponse;
/// let body = ApiResponse::new(42).with_message("Answer computed");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// 失敗レスポンスの統一封筒
///
/// [`AppError`] から構築されます。5xx のメッセージは固定文言に
/// マスクされ、詳細はサーバーログにのみ残ります。
/// `requestId` はリクエストID ミドルウェアが最外層で付与します。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// 5xx の固定クライアント向けメッセージ
pub const GENERIC_SERVER_ERROR: &str = "An unexpected error occurred";

impl ErrorBody {
    /// [`AppError`] から封筒を構築
    ///
    /// サーバーエラーの場合、メッセージは [`GENERIC_SERVER_ERROR`] に
    /// 置き換えられます（内部情報の漏洩防止）。
    pub fn from_error(err: &AppError) -> Self {
        let message = if err.is_server_error() {
            GENERIC_SERVER_ERROR.to_string()
        } else {
            err.message().to_string()
        };

        Self {
            success: false,
            error: message,
            code: err.code().to_string(),
            details: err.details().map(|d| d.to_vec()),
            retry_after: err.retry_after(),
            request_id: None,
        }
    }

    /// リクエストID を付与
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let body = ApiResponse::new(serde_json::json!({"id": 1}));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], 1);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let err = AppError::unauthorized("Invalid email or password").with_code("INVALID_CREDENTIALS");
        let body = ErrorBody::from_error(&err);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid email or password");
        assert_eq!(json["code"], "INVALID_CREDENTIALS");
        assert!(json.get("details").is_none());
        assert!(json.get("requestId").is_none());
    }

    #[test]
    fn test_server_error_is_masked() {
        let io_err = std::io::Error::other("pool exploded in ConnPool::acquire");
        let err = AppError::internal("connection pool failure").with_source(io_err);
        let body = ErrorBody::from_error(&err);
        assert_eq!(body.error, GENERIC_SERVER_ERROR);
        // 内部メッセージもソースの型名も外に出ない
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("pool"));
        assert!(!json.contains("ConnPool"));
    }

    #[test]
    fn test_validation_details_serialized() {
        let err = AppError::validation(vec![FieldError::new("email", "Invalid email format")]);
        let body = ErrorBody::from_error(&err);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["details"][0]["field"], "email");
        assert_eq!(json["code"], "VALIDATION_FAILED");
    }

    #[test]
    fn test_retry_after_serialized_camel_case() {
        let err = AppError::rate_limited("Too many requests", 900);
        let body = ErrorBody::from_error(&err);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["retryAfter"], 900);
    }

    #[test]
    fn test_request_id_attached() {
        let err = AppError::not_found("gone");
        let body = ErrorBody::from_error(&err).with_request_id("req-123");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["requestId"], "req-123");
    }
}
