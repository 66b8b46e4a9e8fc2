//! Relay results as HTTP responses.
//!
//! Every `/auth/*` and `/tools/*` response is `application/json`, errors
//! included. Error bodies reuse the envelope shape:
//! `{"status": "<code>", "reason": "<phrase>", "error": "<detail>"}`.

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::relay::response::reason_phrase;
use crate::relay::{RelayError, RelayReply};

impl IntoResponse for RelayReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest(_)
            | RelayError::InvalidUrl { .. }
            | RelayError::InvalidHeader(_) => StatusCode::BAD_REQUEST,
            RelayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Transport(_) => StatusCode::BAD_GATEWAY,
            RelayError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        error_envelope(self.status_code(), &self.to_string())
    }
}

fn error_envelope(status: StatusCode, error: &str) -> Response {
    let body = json!({
        "status": status.as_u16().to_string(),
        "reason": reason_phrase(status),
        "error": error,
    });
    (status, Json(body)).into_response()
}

/// Rewrite middleware rejections (body limit, server timeout) into the
/// JSON error envelope. Responses that are already JSON pass untouched.
pub async fn envelope_rejections(response: Response) -> Response {
    let error = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => "request body too large",
        StatusCode::REQUEST_TIMEOUT => "request timed out",
        _ => return response,
    };
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return response;
    }
    error_envelope(response.status(), error)
}
