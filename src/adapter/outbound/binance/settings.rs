//! Binance USDT-M futures configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Exchange environment (testnet vs production).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Testnet,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Testnet => write!(f, "testnet"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Binance exchange configuration (`[exchange]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinanceConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_testnet_url")]
    pub testnet_url: String,
    #[serde(default = "default_production_url")]
    pub production_url: String,
    /// Window in which a signed request stays valid, in milliseconds.
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
    #[serde(default)]
    pub http: BinanceHttpConfig,
}

fn default_testnet_url() -> String {
    "https://testnet.binancefuture.com".into()
}

fn default_production_url() -> String {
    "https://fapi.binance.com".into()
}

const fn default_recv_window_ms() -> u64 {
    5000
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            testnet_url: default_testnet_url(),
            production_url: default_production_url(),
            recv_window_ms: default_recv_window_ms(),
            http: BinanceHttpConfig::default(),
        }
    }
}

impl BinanceConfig {
    /// REST base URL for the selected environment.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match self.environment {
            Environment::Testnet => &self.testnet_url,
            Environment::Production => &self.production_url,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, url) in [
            ("exchange.testnet_url", &self.testnet_url),
            ("exchange.production_url", &self.production_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("{url} is not an http(s) URL"),
                });
            }
        }
        // Binance rejects recvWindow above one minute.
        if self.recv_window_ms == 0 || self.recv_window_ms > 60_000 {
            return Err(ConfigError::InvalidValue {
                field: "exchange.recv_window_ms",
                reason: "must be between 1 and 60000".into(),
            });
        }
        self.http.validate()
    }
}

/// Binance HTTP client configuration (`[exchange.http]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinanceHttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum attempts for idempotent reads. Order submissions never retry.
    #[serde(default = "default_http_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default = "default_http_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    10_000
}

const fn default_http_connect_timeout_ms() -> u64 {
    3000
}

const fn default_http_retry_max_attempts() -> u32 {
    3
}

const fn default_http_retry_backoff_ms() -> u64 {
    500
}

impl Default for BinanceHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
            retry_max_attempts: default_http_retry_max_attempts(),
            retry_backoff_ms: default_http_retry_backoff_ms(),
        }
    }
}

impl BinanceHttpConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "exchange.http.timeout_ms",
                reason: "must be greater than 0".into(),
            });
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "exchange.http.connect_timeout_ms",
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}
