//! The network boundary.
//!
//! # Design
//! The pipeline only ever talks to a [`Transport`]: one prepared request in,
//! one raw response out. Connection pooling, TLS, and timeouts live behind
//! this trait. Any failure that prevents a full HTTP response from being read
//! comes back as [`StripeError::Connection`] with status 0, so callers see a
//! single error taxonomy whatever went wrong.
//!
//! [`UreqTransport`] is the default blocking implementation. Tests substitute
//! a stub that records requests and replays canned responses.

use std::time::Duration;

use crate::error::StripeError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, StripeError>;
}

/// Connect-phase and read-phase timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub read: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(30),
            read: Duration::from_secs(80),
        }
    }
}

/// Blocking transport backed by a shared `ureq` agent.
///
/// Non-2xx statuses are returned as data rather than errors so the pipeline
/// can classify them.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeouts: Timeouts) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(timeouts.connect))
            .timeout_recv_response(Some(timeouts.read))
            .timeout_recv_body(Some(timeouts.read))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Timeouts::default())
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, StripeError> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();
        let body = request.body.as_deref().map(str::as_bytes);

        let result = match (request.method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Delete, Some(body)) => with_headers(self.agent.delete(url), headers)
                .force_send_body()
                .send(body),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), headers).send(body),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                with_headers(self.agent.patch(url), headers).send(body)
            }
            (HttpMethod::Patch, None) => with_headers(self.agent.patch(url), headers).send_empty(),
        };

        let mut response = result.map_err(|e| {
            tracing::warn!(method = %request.method, url, error = %e, "request failed before a response arrived");
            match e {
                ureq::Error::Timeout(phase) => {
                    StripeError::connection(format!("request timed out ({phase:?})"))
                }
                other => StripeError::connection(format!("could not reach the API: {other}")),
            }
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response.body_mut().read_to_string().map_err(|e| {
            tracing::warn!(status, error = %e, "failed to read response body");
            StripeError::connection(format!("failed to read response body: {e}"))
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeouts() {
        let t = Timeouts::default();
        assert_eq!(t.connect, Duration::from_secs(30));
        assert_eq!(t.read, Duration::from_secs(80));
    }

    #[test]
    fn unreachable_host_is_a_connection_error() {
        let transport = UreqTransport::new(Timeouts {
            connect: Duration::from_millis(500),
            read: Duration::from_millis(500),
        });
        // Port 9 (discard) on localhost is closed in test environments.
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:9/v1/customers".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let err = transport.send(&request).unwrap_err();
        assert!(matches!(err, StripeError::Connection { status: 0, .. }));
    }
}
