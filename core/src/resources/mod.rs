//! Thin per-resource wrappers over [`StripeClient::request`].
//!
//! # Design
//! Every wrapper is a borrowed handle (`client.customers()`) that knows its
//! base path and forwards caller parameters untouched. Wrappers do no
//! validation of their own; the API is the authority on what a parameter
//! means. Per-call options (idempotency key, connected account, extra
//! headers) are attached to the handle with `with_options`. The options apply
//! to every call made through that handle, so an idempotency key on a handle
//! makes each POST through it a replay of the first. Take a fresh handle per
//! logical operation.

mod balance;
mod checkout_session;
mod coupon;
mod customer;
mod invoice;
mod payment_intent;
mod payment_method;
mod price;
mod product;
mod promotion_code;
mod refund;
mod setup_intent;
mod subscription;

pub use balance::Balance;
pub use checkout_session::CheckoutSessions;
pub use coupon::Coupons;
pub use customer::Customers;
pub use invoice::Invoices;
pub use payment_intent::PaymentIntents;
pub use payment_method::PaymentMethods;
pub use price::Prices;
pub use product::Products;
pub use promotion_code::PromotionCodes;
pub use refund::Refunds;
pub use setup_intent::SetupIntents;
pub use subscription::Subscriptions;

use serde_json::Value;

use crate::client::StripeClient;
use crate::error::StripeError;
use crate::http::HttpMethod;
use crate::params::Params;
use crate::pipeline::RequestOptions;

/// A collection endpoint such as `/v1/customers`, bound to a client.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint<'a> {
    client: &'a StripeClient,
    base: &'static str,
    options: RequestOptions,
}

impl<'a> Endpoint<'a> {
    pub(crate) fn new(client: &'a StripeClient, base: &'static str) -> Self {
        Self {
            client,
            base,
            options: RequestOptions::default(),
        }
    }

    /// Options are shared by every call through this endpoint, idempotency
    /// key included.
    pub(crate) fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    fn call(&self, method: HttpMethod, path: &str, params: &Params) -> Result<Value, StripeError> {
        self.client.request(method, path, Some(params), &self.options)
    }

    /// `{base}/{id}` with the id encoded as one path segment.
    pub(crate) fn object_path(&self, id: &str) -> String {
        format!("{}/{}", self.base, urlencoding::encode(id))
    }

    pub(crate) fn create(&self, params: &Params) -> Result<Value, StripeError> {
        self.call(HttpMethod::Post, self.base, params)
    }

    pub(crate) fn retrieve(&self, id: &str, params: &Params) -> Result<Value, StripeError> {
        self.call(HttpMethod::Get, &self.object_path(id), params)
    }

    pub(crate) fn update(&self, id: &str, params: &Params) -> Result<Value, StripeError> {
        self.call(HttpMethod::Post, &self.object_path(id), params)
    }

    pub(crate) fn delete(&self, id: &str, params: &Params) -> Result<Value, StripeError> {
        self.call(HttpMethod::Delete, &self.object_path(id), params)
    }

    pub(crate) fn list(&self, params: &Params) -> Result<Value, StripeError> {
        self.call(HttpMethod::Get, self.base, params)
    }

    /// `GET {base}/search`; `params` must include a `query`.
    pub(crate) fn search(&self, params: &Params) -> Result<Value, StripeError> {
        self.call(HttpMethod::Get, &format!("{}/search", self.base), params)
    }

    /// `POST {base}/{id}/{action}`, e.g. `confirm` or `cancel`.
    pub(crate) fn action(&self, id: &str, action: &str, params: &Params) -> Result<Value, StripeError> {
        self.call(HttpMethod::Post, &format!("{}/{action}", self.object_path(id)), params)
    }

    /// `GET {base}/{id}/{child}`, for nested lists.
    pub(crate) fn nested_list(&self, id: &str, child: &str, params: &Params) -> Result<Value, StripeError> {
        self.call(HttpMethod::Get, &format!("{}/{child}", self.object_path(id)), params)
    }

    /// `GET` an arbitrary path under the base, e.g. `/v1/invoices/upcoming`.
    pub(crate) fn get_path(&self, suffix: &str, params: &Params) -> Result<Value, StripeError> {
        self.call(HttpMethod::Get, &format!("{}/{suffix}", self.base), params)
    }

    pub(crate) fn get_absolute(&self, path: &str, params: &Params) -> Result<Value, StripeError> {
        self.call(HttpMethod::Get, path, params)
    }
}
