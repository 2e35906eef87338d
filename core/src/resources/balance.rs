//! Account balance and the ledger of balance transactions.

use serde_json::Value;

use super::Endpoint;
use crate::client::StripeClient;
use crate::error::StripeError;
use crate::params::Params;
use crate::pipeline::RequestOptions;

const TRANSACTIONS: &str = "/v1/balance_transactions";

/// `/v1/balance`. Read-only.
#[derive(Debug, Clone)]
pub struct Balance<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> Balance<'a> {
    pub(crate) fn new(client: &'a StripeClient) -> Self {
        Self {
            endpoint: Endpoint::new(client, "/v1/balance"),
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

    /// Current balance of the account (or of the connected account set in
    /// the options).
    pub fn retrieve(&self) -> Result<Value, StripeError> {
        self.endpoint.list(&Params::new())
    }

    pub fn list_transactions(&self, params: &Params) -> Result<Value, StripeError> {
        self.endpoint.get_absolute(TRANSACTIONS, params)
    }

    pub fn retrieve_transaction(&self, id: &str) -> Result<Value, StripeError> {
        let path = format!("{TRANSACTIONS}/{}", urlencoding::encode(id));
        self.endpoint.get_absolute(&path, &Params::new())
    }
}

#[cfg(test)]
mod tests {
    use crate::client::tests::{client_with, StubTransport};
    use crate::http::HttpMethod;
    use crate::params::Params;
    use crate::pipeline::RequestOptions;

    #[test]
    fn balance_paths() {
        let stub = StubTransport::new(200, r#"{"object":"balance","available":[]}"#);
        let client = client_with(&stub);

        let balance = client.balance().retrieve().unwrap();
        assert_eq!(balance["object"], "balance");
        assert_eq!(stub.last().url, "https://api.stripe.com/v1/balance");
        assert_eq!(stub.last().method, HttpMethod::Get);

        client
            .balance()
            .list_transactions(&Params::new().set("limit", 10))
            .unwrap();
        assert_eq!(stub.last().url, "https://api.stripe.com/v1/balance_transactions?limit=10");

        client.balance().retrieve_transaction("txn_1").unwrap();
        assert_eq!(stub.last().url, "https://api.stripe.com/v1/balance_transactions/txn_1");
    }

    #[test]
    fn reads_ignore_idempotency_keys() {
        let stub = StubTransport::new(200, "{}");
        let client = client_with(&stub);
        client
            .balance()
            .with_options(RequestOptions::new().with_idempotency_key("ignored"))
            .retrieve()
            .unwrap();
        assert_eq!(stub.last().header("Idempotency-Key"), None);
    }
}
