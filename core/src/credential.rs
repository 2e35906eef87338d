//! API credential and the headers derived from it.

use std::fmt;

use crate::http::set_header;

/// API version sent when the credential does not pin one.
pub const DEFAULT_API_VERSION: &str = "2024-06-20";

pub const USER_AGENT: &str = concat!("stripe-core/", env!("CARGO_PKG_VERSION"));

/// Secret key plus the account context it acts in. Immutable once built and
/// safe to share across threads.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    secret: String,
    api_version: Option<String>,
    stripe_account: Option<String>,
}

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            api_version: None,
            stripe_account: None,
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Act on behalf of a connected account.
    pub fn with_stripe_account(mut self, account: impl Into<String>) -> Self {
        self.stripe_account = Some(account.into());
        self
    }

    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    pub fn stripe_account(&self) -> Option<&str> {
        self.stripe_account.as_deref()
    }

    /// Base headers for every call. Pure function of the credential.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(4);
        set_header(&mut headers, "Authorization", &format!("Bearer {}", self.secret));
        set_header(&mut headers, "Stripe-Version", self.api_version());
        set_header(&mut headers, "User-Agent", USER_AGENT);
        if let Some(account) = &self.stripe_account {
            set_header(&mut headers, "Stripe-Account", account);
        }
        headers
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("secret", &"[REDACTED]")
            .field("api_version", &self.api_version())
            .field("stripe_account", &self.stripe_account)
            .finish()
    }
}
