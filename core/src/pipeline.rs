//! Stateless request builder and response classifier.
//!
//! # Design
//! `RequestPipeline` holds only the credential and the API origin. A call is
//! split into [`RequestPipeline::build_request`], which produces an
//! `HttpRequest`, and [`RequestPipeline::parse_response`], which turns the
//! `HttpResponse` into either the decoded JSON payload or a classified
//! [`StripeError`]. Both halves are pure, so everything except the network
//! round-trip is testable without a server.
//!
//! Header precedence, lowest first: credential headers, the content type for
//! mutating calls, the idempotency key, caller-supplied headers. Only POST
//! requests ever leave with an `Idempotency-Key`.

use serde::Deserialize;
use serde_json::Value;

use crate::credential::Credential;
use crate::error::StripeError;
use crate::http::{set_header, HttpMethod, HttpRequest, HttpResponse};
use crate::params::Params;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Per-call options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Sent as `Idempotency-Key` on POST requests; ignored otherwise.
    pub idempotency_key: Option<String>,
    /// Extra headers; these win over the base set on a name collision.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Use a fresh random UUID as the idempotency key.
    pub fn with_generated_idempotency_key(self) -> Self {
        self.with_idempotency_key(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Make this one call on behalf of a connected account.
    pub fn with_stripe_account(self, account: impl Into<String>) -> Self {
        self.with_header("Stripe-Account", account)
    }
}

#[derive(Debug, Clone)]
pub struct RequestPipeline {
    credential: Credential,
    api_base: String,
}

impl RequestPipeline {
    pub fn new(credential: Credential, api_base: &str) -> Self {
        Self {
            credential,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<&Params>,
        options: &RequestOptions,
    ) -> HttpRequest {
        let mut headers = self.credential.headers();

        let encoded = params.map(Params::to_form).unwrap_or_default();
        let mut url = format!("{}{}", self.api_base, path);
        let body = if method.is_mutating() {
            set_header(&mut headers, "Content-Type", FORM_CONTENT_TYPE);
            Some(encoded)
        } else {
            if !encoded.is_empty() {
                url.push(if url.contains('?') { '&' } else { '?' });
                url.push_str(&encoded);
            }
            None
        };

        if method == HttpMethod::Post {
            if let Some(key) = &options.idempotency_key {
                set_header(&mut headers, "Idempotency-Key", key);
            }
        }

        for (name, value) in &options.headers {
            set_header(&mut headers, name, value);
        }
        if method != HttpMethod::Post {
            // only create-or-act calls may carry a key, however it was supplied
            headers.retain(|(name, _)| !name.eq_ignore_ascii_case("Idempotency-Key"));
        }

        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    /// Decode a 2xx body, or classify a failure.
    pub fn parse_response(&self, response: &HttpResponse) -> Result<Value, StripeError> {
        let request_id = response.header("request-id");
        tracing::debug!(status = response.status, request_id, "response received");

        if response.is_success() {
            return serde_json::from_str(&response.body).map_err(|e| {
                StripeError::api(
                    response.status,
                    format!("invalid JSON in successful response: {e}"),
                )
            });
        }

        let err = classify_error(response.status, &response.body);
        tracing::warn!(
            kind = %err.kind(),
            status = response.status,
            request_id,
            "API returned an error"
        );
        Err(err)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: String,
    code: Option<String>,
    param: Option<String>,
    decline_code: Option<String>,
    doc_url: Option<String>,
}

/// Map a non-2xx status and body to an error kind by the body's `type`.
pub fn classify_error(status: u16, body: &str) -> StripeError {
    let envelope: ErrorEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            return StripeError::api(status, format!("malformed error response body: {e}"));
        }
    };
    let ErrorBody {
        kind,
        message,
        code,
        param,
        decline_code,
        doc_url,
    } = envelope.error;
    if let Some(doc_url) = doc_url.as_deref() {
        tracing::debug!(doc_url, "error documentation");
    }

    match kind.as_deref() {
        Some("card_error") => StripeError::Card {
            status,
            message,
            code,
            param,
            decline_code,
        },
        Some("invalid_request_error") => StripeError::InvalidRequest {
            status,
            message,
            param,
        },
        Some("authentication_error") => StripeError::Authentication { status, message },
        Some("rate_limit_error") => StripeError::RateLimit { status, message },
        Some("idempotency_error") => StripeError::Idempotency { status, message },
        _ => StripeError::Api { status, message },
    }
}
