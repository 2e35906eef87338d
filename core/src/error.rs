//! Error taxonomy for the Stripe API client.
//!
//! # Design
//! One flat, closed enum instead of an error hierarchy: callers match on the
//! variant and the compiler checks exhaustiveness. Every variant carries the
//! HTTP status that produced it (0 when the call never reached the network)
//! and a human-readable message. `Card` and `InvalidRequest` carry the extra
//! machine-readable fields the remote error envelope provides for them.
//!
//! Parser and transport errors never leak through this type. They are folded
//! into `Api` or `Connection` at the point they happen.

use std::fmt;

use thiserror::Error;

/// Errors returned by every fallible client operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StripeError {
    /// Generic failure reported by the API, or a response that could not be
    /// interpreted (unparseable body, unknown error type).
    #[error("api_error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The API key was missing, malformed, or revoked.
    #[error("authentication_error (status {status}): {message}")]
    Authentication { status: u16, message: String },

    /// The card was declined. `code` and `decline_code` let callers branch on
    /// the reason without inspecting the message.
    #[error("card_error (status {status}): {message}")]
    Card {
        status: u16,
        message: String,
        code: Option<String>,
        param: Option<String>,
        decline_code: Option<String>,
    },

    /// The request had invalid parameters. `param` names the offending one
    /// when the API reports it.
    #[error("invalid_request_error (status {status}): {message}")]
    InvalidRequest {
        status: u16,
        message: String,
        param: Option<String>,
    },

    #[error("rate_limit_error (status {status}): {message}")]
    RateLimit { status: u16, message: String },

    /// An idempotency key was reused with different parameters.
    #[error("idempotency_error (status {status}): {message}")]
    Idempotency { status: u16, message: String },

    /// The request never produced an HTTP response: DNS, refused connection,
    /// timeout, or truncated response.
    #[error("connection_error (status {status}): {message}")]
    Connection { status: u16, message: String },

    #[error("permission_error (status {status}): {message}")]
    Permission { status: u16, message: String },

    #[error("signature_verification_error (status {status}): {message}")]
    SignatureVerification { status: u16, message: String },
}

/// Fieldless discriminant of [`StripeError`], for logging and exhaustive
/// matching without destructuring payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Api,
    Authentication,
    Card,
    InvalidRequest,
    RateLimit,
    Idempotency,
    Connection,
    Permission,
    SignatureVerification,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Api => "api_error",
            ErrorKind::Authentication => "authentication_error",
            ErrorKind::Card => "card_error",
            ErrorKind::InvalidRequest => "invalid_request_error",
            ErrorKind::RateLimit => "rate_limit_error",
            ErrorKind::Idempotency => "idempotency_error",
            ErrorKind::Connection => "connection_error",
            ErrorKind::Permission => "permission_error",
            ErrorKind::SignatureVerification => "signature_verification_error",
        };
        f.write_str(label)
    }
}

impl StripeError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        StripeError::Api {
            status,
            message: message.into(),
        }
    }

    /// A failure below HTTP. Status is always 0.
    pub fn connection(message: impl Into<String>) -> Self {
        StripeError::Connection {
            status: 0,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StripeError::Api { .. } => ErrorKind::Api,
            StripeError::Authentication { .. } => ErrorKind::Authentication,
            StripeError::Card { .. } => ErrorKind::Card,
            StripeError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            StripeError::RateLimit { .. } => ErrorKind::RateLimit,
            StripeError::Idempotency { .. } => ErrorKind::Idempotency,
            StripeError::Connection { .. } => ErrorKind::Connection,
            StripeError::Permission { .. } => ErrorKind::Permission,
            StripeError::SignatureVerification { .. } => ErrorKind::SignatureVerification,
        }
    }

    /// HTTP status of the response that produced this error, or 0.
    pub fn status_code(&self) -> u16 {
        match self {
            StripeError::Api { status, .. }
            | StripeError::Authentication { status, .. }
            | StripeError::Card { status, .. }
            | StripeError::InvalidRequest { status, .. }
            | StripeError::RateLimit { status, .. }
            | StripeError::Idempotency { status, .. }
            | StripeError::Connection { status, .. }
            | StripeError::Permission { status, .. }
            | StripeError::SignatureVerification { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            StripeError::Api { message, .. }
            | StripeError::Authentication { message, .. }
            | StripeError::Card { message, .. }
            | StripeError::InvalidRequest { message, .. }
            | StripeError::RateLimit { message, .. }
            | StripeError::Idempotency { message, .. }
            | StripeError::Connection { message, .. }
            | StripeError::Permission { message, .. }
            | StripeError::SignatureVerification { message, .. } => message,
        }
    }

    /// Machine-readable error code. Only card errors carry one.
    pub fn code(&self) -> Option<&str> {
        match self {
            StripeError::Card { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn param(&self) -> Option<&str> {
        match self {
            StripeError::Card { param, .. } | StripeError::InvalidRequest { param, .. } => {
                param.as_deref()
            }
            _ => None,
        }
    }

    pub fn decline_code(&self) -> Option<&str> {
        match self {
            StripeError::Card { decline_code, .. } => decline_code.as_deref(),
            _ => None,
        }
    }
}
