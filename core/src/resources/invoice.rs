use serde_json::Value;

use super::Endpoint;
use crate::client::StripeClient;
use crate::error::StripeError;
use crate::params::Params;
use crate::pipeline::RequestOptions;

/// `/v1/invoices`
#[derive(Debug, Clone)]
pub struct Invoices<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> Invoices<'a> {
    pub(crate) fn new(client: &'a StripeClient) -> Self {
        Self {
            endpoint: Endpoint::new(client, "/v1/invoices"),
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

    /// Only draft invoices can be deleted; finalized ones must be voided.
    pub fn delete(&self, id: &str) -> Result<Value, StripeError> {
        self.endpoint.delete(id, &Params::new())
    }

    pub fn list(&self, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.list(params)
    }

    pub fn search(&self, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.search(params)
    }

    pub fn finalize(&self, id: &str, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.action(id, "finalize", params)
    }

    pub fn pay(&self, id: &str, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.action(id, "pay", params)
    }

    pub fn send(&self, id: &str) -> Result<Value, StripeError> {
        self.endpoint.action(id, "send", &Params::new())
    }

    pub fn void(&self, id: &str) -> Result<Value, StripeError> {
        self.endpoint.action(id, "void", &Params::new())
    }

    /// Preview the next invoice for a customer or subscription.
    pub fn upcoming(&self, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.get_path("upcoming", params)
    }
}
