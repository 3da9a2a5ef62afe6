//! Request-scoped middleware
//!
//! The outermost layer of the pipeline: assigns every request a trace
//! id, runs the rest of the stack inside a tracing span carrying it,
//! and finalizes error responses so exactly one envelope shape ever
//! leaves the process.

use axum::Json;
use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::envelope::{ErrorBody, GENERIC_SERVER_ERROR};
use tracing::Instrument;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Outermost request middleware
///
/// Takes the client-provided `X-Request-ID` or mints a UUID, makes it
/// available to every log line via the span, echoes it in the response
/// header, and stamps it into normalized error bodies.
pub async fn request_context(req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let response = async {
        tracing::debug!("Request received");
        let response = next.run(req).await;
        if response.status().is_server_error() {
            tracing::error!(status = %response.status(), "Request failed");
        } else {
            tracing::info!(status = %response.status(), "Request completed");
        }
        response
    }
    .instrument(span)
    .await;

    finalize(response, &request_id)
}

/// Attach the request id and normalize error bodies
///
/// Errors produced through `AppError` carry their envelope in the
/// response extensions; it is re-rendered here with the request id.
/// Error responses produced elsewhere (extractor rejections, method
/// mismatches) get a fresh envelope so no foreign body shape escapes.
fn finalize(response: Response, request_id: &str) -> Response {
    let status = response.status();

    let mut response = if status.is_client_error() || status.is_server_error() {
        let body = match response.extensions().get::<ErrorBody>() {
            Some(body) => body.clone(),
            None => foreign_error_body(status),
        }
        .with_request_id(request_id);

        let (mut parts, _) = response.into_parts();
        parts.headers.remove(header::CONTENT_LENGTH);
        parts.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let mut rebuilt = Json(body).into_response();
        *rebuilt.headers_mut() = parts.headers;
        *rebuilt.status_mut() = parts.status;
        rebuilt
    } else {
        response
    };

    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Envelope for error responses not produced through `AppError`
fn foreign_error_body(status: StatusCode) -> ErrorBody {
    let (code, message) = match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Invalid request body"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "Resource not found"),
        StatusCode::METHOD_NOT_ALLOWED => ("METHOD_NOT_ALLOWED", "Method not allowed"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request body too large"),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => {
            ("UNSUPPORTED_MEDIA_TYPE", "Unsupported content type")
        }
        StatusCode::UNPROCESSABLE_ENTITY => ("VALIDATION_FAILED", "Invalid request body"),
        s if s.is_server_error() => ("INTERNAL_SERVER_ERROR", GENERIC_SERVER_ERROR),
        _ => ("REQUEST_FAILED", "Request failed"),
    };

    ErrorBody {
        success: false,
        error: message.to_string(),
        code: code.to_string(),
        details: None,
        retry_after: None,
        request_id: None,
    }
}
