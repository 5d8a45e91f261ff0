//! API credentials.
//!
//! Keys come only from the environment (optionally seeded from `.env` by
//! `dotenvy` at startup), never from the config file.

use std::fmt;

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "BINANCE_API_KEY";
pub const API_SECRET_VAR: &str = "BINANCE_API_SECRET";

const PLACEHOLDER_KEY: &str = "your_api_key_here";

/// API key pair for signed endpoints.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`, rejecting empty or placeholder values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingField { field: API_KEY_VAR })?;
        let api_secret = lookup(API_SECRET_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingField {
                field: API_SECRET_VAR,
            })?;

        if api_key == PLACEHOLDER_KEY {
            return Err(ConfigError::InvalidValue {
                field: API_KEY_VAR,
                reason: format!("replace '{PLACEHOLDER_KEY}' with a real API key"),
            });
        }

        Ok(Self {
            api_key,
            api_secret,
        })
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(super) fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("api_secret", &"***")
            .finish()
    }
}

/// Show only the first four characters of a key.
#[must_use]
pub fn mask(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}***")
}
