//! Upstream response normalization.
//!
//! # Envelope shapes
//! ```text
//! JSON body, plain route          → the parsed JSON value itself
//! JSON body, "with headers" route → {responseBody, status, headers}
//! non-JSON body                   → {status, reason[, responseBody]}
//! ```
//! `status` is always the upstream code as a string; `headers` is the
//! response header map encoded as a JSON string.

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::{Map, Value};

use crate::relay::types::RouteProfile;

/// A captured upstream response.
///
/// Exactly one of `parsed_body` or `reason` is set, depending on whether
/// `raw_body` was valid JSON.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status_code: StatusCode,
    pub raw_body: String,
    pub parsed_body: Option<Value>,
    pub headers: BTreeMap<String, String>,
    pub reason: Option<String>,
}

impl RelayResponse {
    /// `wire_reason` is the phrase from the upstream status line, when it
    /// differs from the canonical one.
    pub fn new(
        status_code: StatusCode,
        wire_reason: Option<&str>,
        headers: &HeaderMap,
        raw_body: String,
    ) -> Self {
        let parsed_body = serde_json::from_str::<Value>(&raw_body).ok();
        let reason = match parsed_body {
            Some(_) => None,
            None => Some(
                wire_reason
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| reason_phrase(status_code))
                    .to_string(),
            ),
        };

        Self {
            status_code,
            raw_body,
            parsed_body,
            headers: flatten_headers(headers),
            reason,
        }
    }

    /// Build the reply the browser receives for this route.
    pub fn into_reply(self, profile: &RouteProfile) -> RelayReply {
        let status = if profile.passthrough_status {
            self.status_code
        } else {
            StatusCode::OK
        };
        let code = self.status_code.as_u16().to_string();

        let body = match self.parsed_body {
            Some(parsed) if !profile.include_headers => parsed,
            Some(_) => {
                let headers = serde_json::to_string(&self.headers).unwrap_or_else(|_| "{}".into());
                let mut envelope = Map::new();
                envelope.insert("responseBody".into(), Value::String(self.raw_body));
                envelope.insert("status".into(), Value::String(code));
                envelope.insert("headers".into(), Value::String(headers));
                Value::Object(envelope)
            }
            None => {
                let reason = self
                    .reason
                    .unwrap_or_else(|| reason_phrase(self.status_code).to_string());
                let mut envelope = Map::new();
                envelope.insert("status".into(), Value::String(code));
                envelope.insert("reason".into(), Value::String(reason));
                if profile.echo_body_on_fallback {
                    envelope.insert("responseBody".into(), Value::String(self.raw_body));
                }
                Value::Object(envelope)
            }
        };

        RelayReply { status, body }
    }
}

/// Final status and JSON body sent back to the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayReply {
    pub status: StatusCode,
    pub body: Value,
}

/// Canonical reason phrase, or `"Unknown"` for unregistered codes.
///
/// Used when the upstream status line carried no phrase of its own.
pub fn reason_phrase(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}

/// Repeated header names are joined with `", "`.
fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        flat.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::types::{
        DELETE_COMMAND, GET_COMMAND, GET_COMMAND_WITH_HEADERS, POST_COMMAND,
        REFRESH_TOKEN_WITH_HEADERS,
    };
    use reqwest::header::{HeaderValue, CONTENT_TYPE, SET_COOKIE};
    use serde_json::json;

    fn upstream(status: u16, body: &str) -> RelayResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        RelayResponse::new(StatusCode::from_u16(status).unwrap(), None, &headers, body.to_string())
    }

    #[test]
    fn test_json_body_returned_as_is() {
        let reply = upstream(200, r#"{"a":1}"#).into_reply(&GET_COMMAND);
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({"a": 1}));
    }

    #[test]
    fn test_json_round_trips_any_value() {
        for value in [json!(null), json!([1, "two", {"three": 3.5}]), json!("s"), json!(true)] {
            let reply = upstream(200, &value.to_string()).into_reply(&POST_COMMAND);
            assert_eq!(reply.body, value);
        }
    }

    #[test]
    fn test_get_fallback_echoes_body() {
        let response = upstream(404, "Not Found");
        assert!(response.parsed_body.is_none());
        assert_eq!(response.reason.as_deref(), Some("Not Found"));

        let reply = response.into_reply(&GET_COMMAND);
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.body,
            json!({"status": "404", "reason": "Not Found", "responseBody": "Not Found"})
        );
    }

    #[test]
    fn test_post_fallback_omits_body() {
        let reply = upstream(500, "<html>boom</html>").into_reply(&POST_COMMAND);
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({"status": "500", "reason": "Internal Server Error"}));
    }

    #[test]
    fn test_delete_passes_status_through() {
        let reply = upstream(204, "").into_reply(&DELETE_COMMAND);
        assert_eq!(reply.status, StatusCode::NO_CONTENT);
        assert_eq!(reply.body, json!({"status": "204", "reason": "No Content"}));

        let reply = upstream(409, r#"{"error":"busy"}"#).into_reply(&DELETE_COMMAND);
        assert_eq!(reply.status, StatusCode::CONFLICT);
        assert_eq!(reply.body, json!({"error": "busy"}));
    }

    #[test]
    fn test_with_headers_envelope() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2"));
        let response = RelayResponse::new(StatusCode::CREATED, None, &headers, r#"{"ok":true}"#.into());

        let reply = response.into_reply(&GET_COMMAND_WITH_HEADERS);
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["responseBody"], r#"{"ok":true}"#);
        assert_eq!(reply.body["status"], "201");

        let encoded = reply.body["headers"].as_str().unwrap();
        let decoded: Value = serde_json::from_str(encoded).unwrap();
        assert_eq!(
            decoded,
            json!({"content-type": "application/json", "set-cookie": "a=1, b=2"})
        );
    }

    #[test]
    fn test_with_headers_fallback_includes_body() {
        let reply = upstream(401, "denied").into_reply(&REFRESH_TOKEN_WITH_HEADERS);
        assert_eq!(
            reply.body,
            json!({"status": "401", "reason": "Unauthorized", "responseBody": "denied"})
        );
    }

    #[test]
    fn test_wire_reason_wins_over_canonical() {
        let response = RelayResponse::new(
            StatusCode::NOT_FOUND,
            Some("Site Gone Fishing"),
            &HeaderMap::new(),
            "nope".into(),
        );
        let reply = response.into_reply(&GET_COMMAND);
        assert_eq!(
            reply.body,
            json!({"status": "404", "reason": "Site Gone Fishing", "responseBody": "nope"})
        );
    }

    #[test]
    fn test_empty_wire_reason_falls_back() {
        let response =
            RelayResponse::new(StatusCode::BAD_GATEWAY, Some(""), &HeaderMap::new(), String::new());
        assert_eq!(response.reason.as_deref(), Some("Bad Gateway"));
    }

    #[test]
    fn test_unknown_status_reason() {
        let reply = upstream(599, "").into_reply(&POST_COMMAND);
        assert_eq!(reply.body, json!({"status": "599", "reason": "Unknown"}));
    }
}
