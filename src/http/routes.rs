//! Route table.
//!
//! # Routes
//! ```text
//! POST /auth/refresh                 refresh token
//! POST /auth/refreshwHeaders         refresh token, headers envelope
//! POST /tools/getCommand             GET relay
//! POST /tools/getCommandwHeaders     GET relay, headers envelope
//! POST /tools/postCommand            POST relay, raw JSON body
//! POST /tools/postFormDataCommand    POST relay, multipart body
//! POST /tools/putCommand             PUT relay
//! POST /tools/patchCommand           PATCH relay
//! POST /tools/patchFormDataCommand   PATCH relay, multipart body
//! POST /tools/deleteCommand          DELETE relay, upstream status passthrough
//! GET  /                             landing page
//! GET  /reachable                    externally visible base URL
//! ```

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::Html;
use axum::routing::{get, post, MethodRouter};
use axum::Router;

use crate::http::server::AppState;
use crate::relay::types::{
    parse_body, DELETE_COMMAND, GET_COMMAND, GET_COMMAND_WITH_HEADERS, PATCH_COMMAND,
    PATCH_FORM_DATA, POST_COMMAND, POST_FORM_DATA, PUT_COMMAND, REFRESH_TOKEN,
    REFRESH_TOKEN_WITH_HEADERS,
};
use crate::relay::{
    CommandRequest, OutboundCall, RelayReply, RelayResult, RouteProfile, TokenRefreshRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/reachable", get(reachable))
        .route("/auth/refresh", token_refresh(&REFRESH_TOKEN))
        .route("/auth/refreshwHeaders", token_refresh(&REFRESH_TOKEN_WITH_HEADERS))
        .route("/tools/getCommand", command(&GET_COMMAND))
        .route("/tools/getCommandwHeaders", command(&GET_COMMAND_WITH_HEADERS))
        .route("/tools/postCommand", command(&POST_COMMAND))
        .route("/tools/postFormDataCommand", command(&POST_FORM_DATA))
        .route("/tools/putCommand", command(&PUT_COMMAND))
        .route("/tools/patchCommand", command(&PATCH_COMMAND))
        .route("/tools/patchFormDataCommand", command(&PATCH_FORM_DATA))
        .route("/tools/deleteCommand", command(&DELETE_COMMAND))
}

fn command(profile: &'static RouteProfile) -> MethodRouter<AppState> {
    post(move |State(state): State<AppState>, body: Bytes| async move {
        relay_command(&state, profile, &body).await
    })
}

fn token_refresh(profile: &'static RouteProfile) -> MethodRouter<AppState> {
    post(move |State(state): State<AppState>, body: Bytes| async move {
        relay_token_refresh(&state, profile, &body).await
    })
}

async fn relay_command(
    state: &AppState,
    profile: &'static RouteProfile,
    body: &[u8],
) -> RelayResult<RelayReply> {
    let call = parse_body::<CommandRequest>(body)
        .and_then(|req| OutboundCall::command(profile, &req))
        .inspect_err(|e| tracing::warn!(route = profile.name, error = %e, "Rejected relay request"))?;

    state.relay.relay(profile, call).await
}

async fn relay_token_refresh(
    state: &AppState,
    profile: &'static RouteProfile,
    body: &[u8],
) -> RelayResult<RelayReply> {
    let call = parse_body::<TokenRefreshRequest>(body)
        .and_then(|req| OutboundCall::token_refresh(profile, &req))
        .inspect_err(|e| tracing::warn!(route = profile.name, error = %e, "Rejected token refresh"))?;

    state.relay.relay(profile, call).await
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

async fn reachable(State(state): State<AppState>, headers: HeaderMap) -> String {
    base_url(&headers, &state.config.listener.bind_address)
}

/// `<scheme>://<host>/` as seen by the caller.
pub fn base_url(headers: &HeaderMap, fallback_host: &str) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(fallback_host);

    format!("{}://{}/", scheme, host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_base_url_from_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("relay.lan:5000"));
        assert_eq!(base_url(&headers, "0.0.0.0:5000"), "http://relay.lan:5000/");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(base_url(&headers, "0.0.0.0:5000"), "https://relay.lan:5000/");
    }

    #[test]
    fn test_base_url_falls_back_to_bind_address() {
        assert_eq!(base_url(&HeaderMap::new(), "0.0.0.0:5000"), "http://0.0.0.0:5000/");
    }
}
