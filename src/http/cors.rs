//! Cross-origin policy.
//!
//! Browsers are the only clients, so every route answers preflights and
//! carries CORS headers, including error responses from inner layers.
//! Credentials are allowed, which rules out wildcard origins: an empty
//! allow-list mirrors the caller's `Origin` back instead.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

pub fn layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allowed_origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o.trim_end_matches('/')).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(header_names(&config.allow_headers))
        .expose_headers(header_names(&config.expose_headers))
        .allow_credentials(true)
        .max_age(Duration::from_secs(config.max_age_secs))
}

fn header_names(names: &[String]) -> Vec<HeaderName> {
    names
        .iter()
        .filter_map(|n| HeaderName::try_from(n.as_str()).ok())
        .collect()
}
