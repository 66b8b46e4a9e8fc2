//! Outbound HTTP client.
//!
//! # Responsibilities
//! - Own the shared `reqwest::Client` (pooling is reqwest's default)
//! - Send exactly one request per relay call, no retries
//! - Classify failures as timeout or transport errors

use std::time::{Duration, Instant};

use reqwest::multipart::{Form, Part};

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::relay::error::{RelayError, RelayResult};
use crate::relay::outbound::{OutboundBody, OutboundCall, TENANT_ID};
use crate::relay::response::{RelayReply, RelayResponse};
use crate::relay::types::RouteProfile;

/// Sends assembled calls to target services.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl RelayClient {
    /// Build the client from upstream settings.
    pub fn new(config: &UpstreamConfig) -> RelayResult<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(config.accept_invalid_certs);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(RelayError::Client)?;

        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification disabled for upstream calls");
        }

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Execute one call and normalize the result for `profile`.
    pub async fn relay(&self, profile: &RouteProfile, call: OutboundCall) -> RelayResult<RelayReply> {
        let start = Instant::now();
        let method = call.method.clone();
        let host = call.url.host_str().unwrap_or_default().to_string();

        tracing::debug!(
            route = profile.name,
            method = %method,
            url = %call.url,
            tenant = call.headers.contains_key(TENANT_ID),
            "Relaying request"
        );

        let response = match self.send(call).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(route = profile.name, method = %method, host = %host, error = %e, "Upstream error");
                metrics::record_upstream_error(profile.name, e.kind());
                return Err(e);
            }
        };

        if response.parsed_body.is_none() {
            tracing::debug!(
                route = profile.name,
                status = response.status_code.as_u16(),
                "No JSON in upstream response"
            );
        }

        let reply = response.into_reply(profile);
        metrics::record_relay(profile.name, reply.status.as_u16(), start);

        tracing::info!(
            route = profile.name,
            method = %method,
            host = %host,
            status = reply.status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Relay complete"
        );

        Ok(reply)
    }

    /// Send the call and capture the upstream response.
    pub async fn send(&self, call: OutboundCall) -> RelayResult<RelayResponse> {
        let request = self
            .client
            .request(call.method, call.url)
            .headers(call.headers);

        let request = match call.body {
            OutboundBody::Empty => request,
            OutboundBody::Raw(body) => request.body(body),
            OutboundBody::Part {
                name,
                file_name,
                content,
            } => {
                let part = Part::bytes(content.into_bytes()).file_name(file_name);
                request.multipart(Form::new().part(name, part))
            }
        };

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        let headers = response.headers().clone();
        // hyper only records the phrase when it is not the canonical one.
        let wire_reason = response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
            .map(str::to_string);
        let raw_body = response.text().await.map_err(|e| self.classify(e))?;

        Ok(RelayResponse::new(status, wire_reason.as_deref(), &headers, raw_body))
    }

    fn classify(&self, error: reqwest::Error) -> RelayError {
        if error.is_timeout() {
            RelayError::Timeout(self.timeout_secs)
        } else {
            RelayError::Transport(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_default_config() {
        assert!(RelayClient::new(&UpstreamConfig::default()).is_ok());
    }
}
