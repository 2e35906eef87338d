//! The client handle that callers construct once and pass around.
//!
//! # Design
//! `StripeClient` pairs a [`RequestPipeline`] with a [`Transport`]. It has no
//! mutable state, so a single value (or clones of it, which share the
//! transport) can serve concurrent callers. Each call performs exactly one
//! round-trip: no retries, no backoff.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::StripeError;
use crate::http::HttpMethod;
use crate::params::Params;
use crate::pipeline::{RequestOptions, RequestPipeline};
use crate::resources::{
    Balance, CheckoutSessions, Coupons, Customers, Invoices, PaymentIntents, PaymentMethods,
    Prices, Products, PromotionCodes, Refunds, SetupIntents, Subscriptions,
};
use crate::transport::{Transport, UreqTransport};

#[derive(Clone)]
pub struct StripeClient {
    pipeline: RequestPipeline,
    transport: Arc<dyn Transport>,
}

impl StripeClient {
    /// Client for the default API origin over the default transport.
    pub fn new(secret_key: &str) -> Self {
        Self::from_config(&ClientConfig::new(secret_key))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_transport(
            config.credential(),
            &config.api_base,
            Arc::new(UreqTransport::new(config.timeouts)),
        )
    }

    pub fn with_transport(
        credential: Credential,
        api_base: &str,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            pipeline: RequestPipeline::new(credential, api_base),
            transport,
        }
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    /// Perform one API call and return the decoded JSON payload.
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<&Params>,
        options: &RequestOptions,
    ) -> Result<Value, StripeError> {
        self.round_trip(method, path, params, options)
            .map(|(_, value)| value)
    }

    /// One call, keeping the success status next to the payload.
    fn round_trip(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<&Params>,
        options: &RequestOptions,
    ) -> Result<(u16, Value), StripeError> {
        let request = self.pipeline.build_request(method, path, params, options);
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            headers = ?request.redacted_headers(),
            "sending request"
        );
        let response = self.transport.send(&request)?;
        let value = self.pipeline.parse_response(&response)?;
        Ok((response.status, value))
    }

    /// Like [`request`](Self::request), decoding the payload into `T`. A
    /// payload that does not fit `T` is reported as a generic API error.
    pub fn request_as<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<&Params>,
        options: &RequestOptions,
    ) -> Result<T, StripeError> {
        let (status, value) = self.round_trip(method, path, params, options)?;
        serde_json::from_value(value)
            .map_err(|e| StripeError::api(status, format!("unexpected response shape: {e}")))
    }

    pub fn customers(&self) -> Customers<'_> {
        Customers::new(self)
    }

    pub fn payment_methods(&self) -> PaymentMethods<'_> {
        PaymentMethods::new(self)
    }

    pub fn payment_intents(&self) -> PaymentIntents<'_> {
        PaymentIntents::new(self)
    }

    pub fn setup_intents(&self) -> SetupIntents<'_> {
        SetupIntents::new(self)
    }

    pub fn invoices(&self) -> Invoices<'_> {
        Invoices::new(self)
    }

    pub fn subscriptions(&self) -> Subscriptions<'_> {
        Subscriptions::new(self)
    }

    pub fn prices(&self) -> Prices<'_> {
        Prices::new(self)
    }

    pub fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    pub fn coupons(&self) -> Coupons<'_> {
        Coupons::new(self)
    }

    pub fn promotion_codes(&self) -> PromotionCodes<'_> {
        PromotionCodes::new(self)
    }

    pub fn refunds(&self) -> Refunds<'_> {
        Refunds::new(self)
    }

    pub fn balance(&self) -> Balance<'_> {
        Balance::new(self)
    }

    pub fn checkout_sessions(&self) -> CheckoutSessions<'_> {
        CheckoutSessions::new(self)
    }
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::types::Deleted;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every request and replies with a fixed response.
    pub(crate) struct StubTransport {
        pub(crate) status: u16,
        pub(crate) body: String,
        pub(crate) requests: Mutex<Vec<HttpRequest>>,
    }

    impl StubTransport {
        pub(crate) fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_string(),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn last(&self) -> HttpRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for StubTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, StripeError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, StripeError> {
            Err(StripeError::connection("connection refused"))
        }
    }

    pub(crate) fn client_with(stub: &Arc<StubTransport>) -> StripeClient {
        StripeClient::with_transport(
            Credential::new("sk_test_client"),
            "https://api.stripe.com",
            stub.clone(),
        )
    }

    #[test]
    fn create_customer_end_to_end() {
        let stub = StubTransport::new(
            200,
            r#"{"id":"cus_1","object":"customer","email":"x@example.com"}"#,
        );
        let client = client_with(&stub);
        let params = Params::from(json!({"email": "x@example.com"}));
        let value = client
            .request(HttpMethod::Post, "/v1/customers", Some(&params), &RequestOptions::new())
            .unwrap();
        assert_eq!(value["id"], "cus_1");

        let sent = stub.last();
        assert_eq!(sent.url, "https://api.stripe.com/v1/customers");
        assert_eq!(sent.body.as_deref(), Some("email=x%40example.com"));
        assert_eq!(stub.requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn declined_card_end_to_end() {
        let stub = StubTransport::new(
            402,
            r#"{"error":{"type":"card_error","message":"Your card was declined.","code":"card_declined"}}"#,
        );
        let client = client_with(&stub);
        let params = Params::from(json!({"email": "x@example.com"}));
        let err = client
            .request(HttpMethod::Post, "/v1/customers", Some(&params), &RequestOptions::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Card);
        assert_eq!(err.message(), "Your card was declined.");
        assert_eq!(err.code(), Some("card_declined"));
        assert_eq!(err.status_code(), 402);
    }

    #[test]
    fn transport_failure_surfaces_as_connection_error() {
        let client = StripeClient::with_transport(
            Credential::new("sk_test_client"),
            "https://api.stripe.com",
            Arc::new(FailingTransport),
        );
        let err = client
            .request(HttpMethod::Get, "/v1/balance", None, &RequestOptions::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert_eq!(err.status_code(), 0);
    }

    #[test]
    fn request_as_decodes_typed_payload() {
        let stub = StubTransport::new(200, r#"{"id":"cus_1","object":"customer","deleted":true}"#);
        let deleted: Deleted = client_with(&stub)
            .request_as(HttpMethod::Delete, "/v1/customers/cus_1", None, &RequestOptions::new())
            .unwrap();
        assert_eq!(deleted.id, "cus_1");
        assert!(deleted.deleted);
    }

    #[test]
    fn request_as_reports_shape_mismatch() {
        let stub = StubTransport::new(200, r#"{"object":"customer"}"#);
        let err = client_with(&stub)
            .request_as::<Deleted>(HttpMethod::Get, "/v1/customers/cus_1", None, &RequestOptions::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status_code(), 200);
    }

    #[test]
    fn shape_mismatch_keeps_the_success_status() {
        let stub = StubTransport::new(201, r#"{"object":"customer"}"#);
        let err = client_with(&stub)
            .request_as::<Deleted>(HttpMethod::Post, "/v1/customers", None, &RequestOptions::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status_code(), 201);
        assert!(err.message().starts_with("unexpected response shape"));
    }

    #[test]
    fn debug_hides_secret() {
        let stub = StubTransport::new(200, "{}");
        let rendered = format!("{:?}", client_with(&stub));
        assert!(!rendered.contains("sk_test_client"));
    }
}
