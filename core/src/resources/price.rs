use serde_json::Value;

use super::Endpoint;
use crate::client::StripeClient;
use crate::error::StripeError;
use crate::params::Params;
use crate::pipeline::RequestOptions;

/// `/v1/prices`
#[derive(Debug, Clone)]
pub struct Prices<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> Prices<'a> {
    pub(crate) fn new(client: &'a StripeClient) -> Self {
        Self {
            endpoint: Endpoint::new(client, "/v1/prices"),
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
}

#[cfg(test)]
mod tests {
    use crate::client::tests::{client_with, StubTransport};
    use crate::params::Params;
    use serde_json::json;

    #[test]
    fn recurring_price_body() {
        let stub = StubTransport::new(200, r#"{"id":"price_1"}"#);
        let client = client_with(&stub);
        let params = Params::from(json!({
            "unit_amount": 1500,
            "currency": "eur",
            "recurring": {"interval": "month"},
            "product": "prod_1"
        }));
        client.prices().create(&params).unwrap();
        assert_eq!(
            stub.last().body.as_deref(),
            Some("unit_amount=1500&currency=eur&recurring[interval]=month&product=prod_1")
        );
    }
}
