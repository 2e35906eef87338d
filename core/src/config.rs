//! Client configuration from code, the environment, or a `KEY=value` file.
//!
//! Recognised keys:
//!
//! | key | meaning | default |
//! |---|---|---|
//! | `STRIPE_SECRET_KEY` | secret API key | required |
//! | `STRIPE_API_VERSION` | pinned API version | [`DEFAULT_API_VERSION`] |
//! | `STRIPE_ACCOUNT` | connected account id | none |
//! | `STRIPE_API_BASE` | API origin | `https://api.stripe.com` |
//! | `STRIPE_CONNECT_TIMEOUT_SECS` | connect timeout | 30 |
//! | `STRIPE_READ_TIMEOUT_SECS` | read timeout | 80 |

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::credential::{Credential, DEFAULT_API_VERSION};
use crate::transport::Timeouts;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Startup-time configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} is not a valid number of seconds: {value:?}")]
    InvalidTimeout { key: &'static str, value: String },

    #[error("failed to read config file: {0}")]
    File(#[from] dotenvy::Error),
}

#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_version: Option<String>,
    pub stripe_account: Option<String>,
    pub api_base: String,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_version: None,
            stripe_account: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn with_stripe_account(mut self, account: impl Into<String>) -> Self {
        self.stripe_account = Some(account.into());
        self
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings from a dotenv-style file without touching the process
    /// environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut vars = HashMap::new();
        for item in dotenvy::from_path_iter(path.as_ref())? {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("STRIPE_SECRET_KEY").ok_or(ConfigError::Missing("STRIPE_SECRET_KEY"))?;
        let defaults = Timeouts::default();
        let timeouts = Timeouts {
            connect: parse_secs(
                "STRIPE_CONNECT_TIMEOUT_SECS",
                non_empty("STRIPE_CONNECT_TIMEOUT_SECS"),
                defaults.connect,
            )?,
            read: parse_secs(
                "STRIPE_READ_TIMEOUT_SECS",
                non_empty("STRIPE_READ_TIMEOUT_SECS"),
                defaults.read,
            )?,
        };

        Ok(Self {
            api_key,
            api_version: non_empty("STRIPE_API_VERSION"),
            stripe_account: non_empty("STRIPE_ACCOUNT"),
            api_base: non_empty("STRIPE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeouts,
        })
    }

    pub fn credential(&self) -> Credential {
        let mut credential = Credential::new(&self.api_key);
        if let Some(version) = &self.api_version {
            credential = credential.with_api_version(version);
        }
        if let Some(account) = &self.stripe_account {
            credential = credential.with_stripe_account(account);
        }
        credential
    }
}

fn parse_secs(
    key: &'static str,
    value: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidTimeout { key, value: raw }),
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field(
                "api_version",
                &self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION),
            )
            .field("stripe_account", &self.stripe_account)
            .field("api_base", &self.api_base)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}
