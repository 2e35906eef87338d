//! Payment intents track one payment from creation through confirmation to
//! capture. Confirmation with a declined card comes back as
//! [`StripeError::Card`].

use serde_json::Value;

use super::Endpoint;
use crate::client::StripeClient;
use crate::error::StripeError;
use crate::params::Params;
use crate::pipeline::RequestOptions;

/// `/v1/payment_intents`
#[derive(Debug, Clone)]
pub struct PaymentIntents<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> PaymentIntents<'a> {
    pub(crate) fn new(client: &'a StripeClient) -> Self {
        Self {
            endpoint: Endpoint::new(client, "/v1/payment_intents"),
        }
    }

    /// Attach per-call options to every request made through this handle.
    /// A handle carrying an idempotency key stands for one logical operation:
    /// each POST through it resends the same key.
    pub fn with_options(self, options: RequestOptions) -> Self {
        Self {
            endpoint: self.endpoint.with_options(options),
        }
    }

    pub fn create(&self, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.create(params)
    }

    pub fn retrieve(&self, id: &str, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.retrieve(id, params)
    }

    pub fn update(&self, id: &str, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.update(id, params)
    }

    pub fn list(&self, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.list(params)
    }

    pub fn search(&self, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.search(params)
    }

    pub fn confirm(&self, id: &str, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.action(id, "confirm", params)
    }

    /// Capture funds of an intent created with `capture_method=manual`.
    pub fn capture(&self, id: &str, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.action(id, "capture", params)
    }

    pub fn cancel(&self, id: &str, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.action(id, "cancel", params)
    }
}
