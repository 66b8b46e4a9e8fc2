//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and addresses.
//! Every problem is reported, not just the first.

use std::net::{SocketAddr, ToSocketAddrs};
use thiserror::Error;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: invalid header name {value:?}")]
    InvalidHeaderName { field: &'static str, value: String },

    #[error("cors.allowed_origins: invalid origin {0:?}")]
    InvalidOrigin(String),

    #[error(
        "timeouts.request_secs ({request_secs}) must exceed upstream.timeout_secs ({upstream_secs})"
    )]
    TimeoutOrder { request_secs: u64, upstream_secs: u64 },
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Host names are allowed here since the listener resolves them.
    let resolves = config
        .listener
        .bind_address
        .to_socket_addrs()
        .map(|mut addrs| addrs.next().is_some())
        .unwrap_or(false);
    if !resolves {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    let non_zero = [
        ("upstream.timeout_secs", config.upstream.timeout_secs as usize),
        ("upstream.connect_timeout_secs", config.upstream.connect_timeout_secs as usize),
        ("timeouts.request_secs", config.timeouts.request_secs as usize),
        ("limits.max_body_bytes", config.limits.max_body_bytes),
        ("logging.max_bytes", config.logging.max_bytes),
        ("logging.max_backups", config.logging.max_backups),
    ];
    for (field, value) in non_zero {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    // The server-side timeout must not preempt the outbound one, or a slow
    // upstream yields a bare 408 instead of a 504.
    if config.upstream.timeout_secs > 0
        && config.timeouts.request_secs <= config.upstream.timeout_secs
    {
        errors.push(ValidationError::TimeoutOrder {
            request_secs: config.timeouts.request_secs,
            upstream_secs: config.upstream.timeout_secs,
        });
    }

    for (field, names) in [
        ("cors.allow_headers", &config.cors.allow_headers),
        ("cors.expose_headers", &config.cors.expose_headers),
    ] {
        for name in names {
            if axum::http::HeaderName::try_from(name.as_str()).is_err() {
                errors.push(ValidationError::InvalidHeaderName {
                    field,
                    value: name.clone(),
                });
            }
        }
    }

    for origin in &config.cors.allowed_origins {
        let valid = url::Url::parse(origin)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
