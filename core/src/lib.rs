//! Typed client for the Stripe REST API.
//!
//! # Overview
//! Every call goes through one pipeline: nested [`Params`] are flattened
//! into bracket-notation form fields, headers are derived from the
//! [`Credential`], a [`Transport`] performs the round-trip, and the response
//! is either decoded JSON or a classified [`StripeError`].
//!
//! # Design
//! - `RequestPipeline` is pure: `build_request` produces an `HttpRequest`
//!   and `parse_response` consumes an `HttpResponse`. Only the transport
//!   touches the network, so the pipeline is tested against stubs.
//! - `StripeClient` is an explicit handle, cheap to clone and safe to share.
//!   There is no global default client.
//! - Resource wrappers (`client.customers()`, `client.invoices()`, ...) fix
//!   the path and forward parameters unchanged.
//! - One round-trip per call. Retries are the caller's decision; pass an
//!   idempotency key in [`RequestOptions`] to make them safe.
//!
//! ```no_run
//! use stripe_core::{Params, StripeClient};
//!
//! let client = StripeClient::new("sk_test_...");
//! let customer = client
//!     .customers()
//!     .create(&Params::new().set("email", "jenny@example.com"))?;
//! println!("{}", customer["id"]);
//! # Ok::<(), stripe_core::StripeError>(())
//! ```

pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod http;
pub mod params;
pub mod pipeline;
pub mod resources;
pub mod transport;
pub mod types;

pub use client::StripeClient;
pub use config::{ClientConfig, ConfigError};
pub use credential::{Credential, DEFAULT_API_VERSION};
pub use error::{ErrorKind, StripeError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{ParamValue, Params};
pub use pipeline::{RequestOptions, RequestPipeline};
pub use transport::{Timeouts, Transport, UreqTransport};
pub use types::{Deleted, List, SearchResult};
