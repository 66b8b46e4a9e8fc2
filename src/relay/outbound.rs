//! Outbound call assembly.
//!
//! Turns a route profile plus an inbound request into the exact method, URL,
//! headers and body that will be sent to the target service. Pure; nothing
//! here touches the network.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE,
};
use reqwest::Method;
use url::Url;

use crate::relay::error::{RelayError, RelayResult};
use crate::relay::types::{payload_text, BodyMode, CommandRequest, RouteProfile, TokenRefreshRequest};

/// Tenant scoping header understood by multi-tenant upstreams.
pub const TENANT_ID: HeaderName = HeaderName::from_static("tenantid");

/// Body of an outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundBody {
    Empty,
    /// Sent as-is; the client already serialized it.
    Raw(String),
    /// One multipart file part.
    Part {
        name: &'static str,
        file_name: &'static str,
        content: String,
    },
}

/// A fully assembled outbound HTTP call.
#[derive(Debug, Clone)]
pub struct OutboundCall {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: OutboundBody,
}

impl OutboundCall {
    /// Assemble a call for one of the `/tools/*` routes.
    pub fn command(profile: &RouteProfile, req: &CommandRequest) -> RelayResult<Self> {
        let url = parse_target_url(&req.url)?;
        let mut headers = base_headers(&req.access_token)?;

        let body = match profile.body {
            BodyMode::None => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                OutboundBody::Empty
            }
            BodyMode::Json { required } => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                match &req.data {
                    Some(data) => OutboundBody::Raw(payload_text(data)),
                    None if required => {
                        return Err(RelayError::InvalidRequest("missing field `data`".into()))
                    }
                    None => OutboundBody::Empty,
                }
            }
            BodyMode::Form => {
                headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
                form_part(req)
            }
            BodyMode::TokenRefresh => {
                return Err(RelayError::InvalidRequest(format!(
                    "route {} expects a token refresh request",
                    profile.name
                )))
            }
        };

        if let Some(tenant) = &req.tenant_id {
            let value =
                HeaderValue::from_str(tenant).map_err(|_| RelayError::InvalidHeader("TenantID"))?;
            headers.insert(TENANT_ID, value);
        }

        Ok(Self {
            method: profile.method.clone(),
            url,
            headers,
            body,
        })
    }

    /// Assemble the OAuth2 refresh-token exchange against `{base_url}/oauth2/token`.
    pub fn token_refresh(profile: &RouteProfile, req: &TokenRefreshRequest) -> RelayResult<Self> {
        let endpoint = format!("{}/oauth2/token", req.base_url.trim_end_matches('/'));
        let url = parse_target_url(&endpoint)?;

        let mut headers = base_headers(&req.access_token)?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let payload = serde_json::json!({
            "client_id": req.client_id,
            "client_secret": req.client_secret,
            "grant_type": "refresh_token",
            "refresh_token": req.refresh_token,
        });

        Ok(Self {
            method: profile.method.clone(),
            url,
            headers,
            body: OutboundBody::Raw(payload.to_string()),
        })
    }
}

/// First match wins: `template`, then `variables`, else no body.
fn form_part(req: &CommandRequest) -> OutboundBody {
    if let Some(template) = &req.template {
        OutboundBody::Part {
            name: "template",
            file_name: "template.txt",
            content: payload_text(template),
        }
    } else if let Some(variables) = &req.variables {
        OutboundBody::Part {
            name: "variables",
            file_name: "variables.txt",
            content: payload_text(variables),
        }
    } else {
        OutboundBody::Empty
    }
}

fn base_headers(access_token: &str) -> RelayResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", access_token))
        .map_err(|_| RelayError::InvalidHeader("Authorization"))?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);

    Ok(headers)
}

/// Parse a caller-supplied target, accepting only http and https.
pub fn parse_target_url(raw: &str) -> RelayResult<Url> {
    let url = Url::parse(raw).map_err(|e| RelayError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RelayError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::types::{
        DELETE_COMMAND, GET_COMMAND, PATCH_FORM_DATA, POST_COMMAND, POST_FORM_DATA, PUT_COMMAND,
        REFRESH_TOKEN,
    };
    use serde_json::json;

    fn command(value: serde_json::Value) -> CommandRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_get_sets_bearer_and_no_body() {
        let req = command(json!({"url": "https://svc/x", "access_token": "T"}));
        let call = OutboundCall::command(&GET_COMMAND, &req).unwrap();

        assert_eq!(call.method, Method::GET);
        assert_eq!(call.url.as_str(), "https://svc/x");
        assert_eq!(call.headers[AUTHORIZATION], "Bearer T");
        assert_eq!(call.headers[CACHE_CONTROL], "no-cache");
        assert_eq!(call.headers[CONTENT_TYPE], "application/json");
        assert_eq!(call.body, OutboundBody::Empty);
    }

    #[test]
    fn test_tenant_header_only_when_present() {
        let with = command(json!({"url": "https://svc/x", "access_token": "T", "tenantID": "acme"}));
        let call = OutboundCall::command(&POST_COMMAND, &with).unwrap();
        assert_eq!(call.headers[&TENANT_ID], "acme");

        let without = command(json!({"url": "https://svc/x", "access_token": "T"}));
        let call = OutboundCall::command(&POST_COMMAND, &without).unwrap();
        assert!(call.headers.get(&TENANT_ID).is_none());
    }

    #[test]
    fn test_json_body_sent_verbatim() {
        let req = command(json!({
            "url": "https://svc/x",
            "access_token": "T",
            "data": "{\"name\":  \"ap-1\"}"
        }));
        let call = OutboundCall::command(&DELETE_COMMAND, &req).unwrap();
        assert_eq!(call.method, Method::DELETE);
        assert_eq!(call.body, OutboundBody::Raw("{\"name\":  \"ap-1\"}".into()));
    }

    #[test]
    fn test_put_requires_data() {
        let req = command(json!({"url": "https://svc/x", "access_token": "T"}));
        let err = OutboundCall::command(&PUT_COMMAND, &req).unwrap_err();
        assert!(matches!(err, RelayError::InvalidRequest(_)));

        let req = command(json!({"url": "https://svc/x", "access_token": "T"}));
        let call = OutboundCall::command(&POST_COMMAND, &req).unwrap();
        assert_eq!(call.body, OutboundBody::Empty);
    }

    #[test]
    fn test_form_template_wins_over_variables() {
        let req = command(json!({
            "url": "https://svc/x",
            "access_token": "T",
            "template": "hostname %name%",
            "variables": "{\"name\":\"sw1\"}"
        }));
        let call = OutboundCall::command(&POST_FORM_DATA, &req).unwrap();

        assert_eq!(call.headers[ACCEPT], "*/*");
        assert!(call.headers.get(CONTENT_TYPE).is_none());
        assert_eq!(
            call.body,
            OutboundBody::Part {
                name: "template",
                file_name: "template.txt",
                content: "hostname %name%".into(),
            }
        );
    }

    #[test]
    fn test_form_variables_and_empty() {
        let req = command(json!({"url": "https://svc/x", "access_token": "T", "variables": "v"}));
        let call = OutboundCall::command(&PATCH_FORM_DATA, &req).unwrap();
        assert_eq!(call.method, Method::PATCH);
        assert!(matches!(call.body, OutboundBody::Part { name: "variables", file_name: "variables.txt", .. }));

        let req = command(json!({"url": "https://svc/x", "access_token": "T"}));
        let call = OutboundCall::command(&PATCH_FORM_DATA, &req).unwrap();
        assert_eq!(call.body, OutboundBody::Empty);
    }

    #[test]
    fn test_rejects_non_http_url() {
        let req = command(json!({"url": "file:///etc/passwd", "access_token": "T"}));
        assert!(matches!(
            OutboundCall::command(&GET_COMMAND, &req),
            Err(RelayError::InvalidUrl { .. })
        ));

        let req = command(json!({"url": "not a url", "access_token": "T"}));
        assert!(matches!(
            OutboundCall::command(&GET_COMMAND, &req),
            Err(RelayError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_token_with_newline_is_invalid_header() {
        let req = command(json!({"url": "https://svc/x", "access_token": "T\nX-Evil: 1"}));
        let err = OutboundCall::command(&GET_COMMAND, &req).unwrap_err();
        assert!(matches!(err, RelayError::InvalidHeader("Authorization")));
    }

    #[test]
    fn test_token_refresh_body_and_endpoint() {
        let req: TokenRefreshRequest = serde_json::from_value(json!({
            "base_url": "https://apigw.example.com/",
            "client_id": "cid",
            "client_secret": "secret",
            "access_token": "old",
            "refresh_token": "rt"
        }))
        .unwrap();
        let call = OutboundCall::token_refresh(&REFRESH_TOKEN, &req).unwrap();

        assert_eq!(call.method, Method::POST);
        assert_eq!(call.url.as_str(), "https://apigw.example.com/oauth2/token");
        assert_eq!(call.headers[AUTHORIZATION], "Bearer old");
        let OutboundBody::Raw(body) = call.body else {
            panic!("expected raw body");
        };
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            body,
            json!({
                "client_id": "cid",
                "client_secret": "secret",
                "grant_type": "refresh_token",
                "refresh_token": "rt"
            })
        );
    }
}
