use serde_json::Value;

use super::Endpoint;
use crate::client::StripeClient;
use crate::error::StripeError;
use crate::params::Params;
use crate::pipeline::RequestOptions;

/// `/v1/payment_methods`
#[derive(Debug, Clone)]
pub struct PaymentMethods<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> PaymentMethods<'a> {
    pub(crate) fn new(client: &'a StripeClient) -> Self {
        Self {
            endpoint: Endpoint::new(client, "/v1/payment_methods"),
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

    /// Attach to a customer; `params` carries `customer`.
    pub fn attach(&self, id: &str, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.action(id, "attach", params)
    }

    pub fn detach(&self, id: &str) -> Result<Value, StripeError> {
        self.endpoint.action(id, "detach", &Params::new())
    }
}
