//! Inbound request shapes and per-route relay profiles.

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::relay::error::{RelayError, RelayResult};

/// A relay command as sent by the browser client.
///
/// Only `url` and `access_token` are required. Which of the optional payload
/// fields matter depends on the route's [`BodyMode`].
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    pub url: String,
    pub access_token: String,
    #[serde(default, rename = "tenantID", alias = "tenantId", alias = "tenant_id")]
    pub tenant_id: Option<String>,
    /// Raw body for JSON-bodied routes.
    #[serde(default)]
    pub data: Option<Value>,
    /// Multipart `template` part for form-data routes.
    #[serde(default)]
    pub template: Option<Value>,
    /// Multipart `variables` part for form-data routes.
    #[serde(default)]
    pub variables: Option<Value>,
}

/// OAuth2 refresh-token exchange parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshRequest {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// How the outbound body is assembled for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// Never send a body.
    None,
    /// Send `data` verbatim with a JSON content type.
    Json { required: bool },
    /// Send `template` or `variables` as a single multipart file part.
    Form,
    /// Build the OAuth2 refresh-token body from the request fields.
    TokenRefresh,
}

/// Behavior switches for one relay route.
#[derive(Debug, Clone)]
pub struct RouteProfile {
    /// Route identifier for logging/metrics.
    pub name: &'static str,
    pub method: Method,
    pub body: BodyMode,
    /// Wrap the raw body, status and response headers into an envelope.
    pub include_headers: bool,
    /// Reply with the upstream status code instead of 200.
    pub passthrough_status: bool,
    /// Include `responseBody` when the upstream body is not JSON.
    pub echo_body_on_fallback: bool,
}

pub static REFRESH_TOKEN: RouteProfile = RouteProfile {
    name: "refresh",
    method: Method::POST,
    body: BodyMode::TokenRefresh,
    include_headers: false,
    passthrough_status: false,
    echo_body_on_fallback: false,
};

pub static REFRESH_TOKEN_WITH_HEADERS: RouteProfile = RouteProfile {
    name: "refresh_with_headers",
    method: Method::POST,
    body: BodyMode::TokenRefresh,
    include_headers: true,
    passthrough_status: false,
    echo_body_on_fallback: true,
};

pub static GET_COMMAND: RouteProfile = RouteProfile {
    name: "get",
    method: Method::GET,
    body: BodyMode::None,
    include_headers: false,
    passthrough_status: false,
    echo_body_on_fallback: true,
};

pub static GET_COMMAND_WITH_HEADERS: RouteProfile = RouteProfile {
    name: "get_with_headers",
    method: Method::GET,
    body: BodyMode::None,
    include_headers: true,
    passthrough_status: false,
    echo_body_on_fallback: true,
};

pub static POST_COMMAND: RouteProfile = RouteProfile {
    name: "post",
    method: Method::POST,
    body: BodyMode::Json { required: false },
    include_headers: false,
    passthrough_status: false,
    echo_body_on_fallback: false,
};

pub static POST_FORM_DATA: RouteProfile = RouteProfile {
    name: "post_form_data",
    method: Method::POST,
    body: BodyMode::Form,
    include_headers: false,
    passthrough_status: false,
    echo_body_on_fallback: false,
};

pub static PUT_COMMAND: RouteProfile = RouteProfile {
    name: "put",
    method: Method::PUT,
    body: BodyMode::Json { required: true },
    include_headers: false,
    passthrough_status: false,
    echo_body_on_fallback: false,
};

pub static PATCH_COMMAND: RouteProfile = RouteProfile {
    name: "patch",
    method: Method::PATCH,
    body: BodyMode::Json { required: true },
    include_headers: false,
    passthrough_status: false,
    echo_body_on_fallback: false,
};

pub static PATCH_FORM_DATA: RouteProfile = RouteProfile {
    name: "patch_form_data",
    method: Method::PATCH,
    body: BodyMode::Form,
    include_headers: false,
    passthrough_status: false,
    echo_body_on_fallback: false,
};

pub static DELETE_COMMAND: RouteProfile = RouteProfile {
    name: "delete",
    method: Method::DELETE,
    body: BodyMode::Json { required: false },
    include_headers: false,
    passthrough_status: true,
    echo_body_on_fallback: false,
};

/// Decode an inbound JSON body, reporting missing fields as a client error.
pub fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> RelayResult<T> {
    serde_json::from_slice(body).map_err(|e| RelayError::InvalidRequest(e.to_string()))
}

/// Text to put on the wire for a caller-supplied payload.
///
/// Strings are already serialized by the client and go out untouched.
pub fn payload_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
