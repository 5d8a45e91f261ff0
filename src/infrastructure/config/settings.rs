//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application
//! settings. Configuration is loaded from a TOML file; API credentials are
//! never read from it and come only from the environment.
//!
//! # Example
//!
//! ```no_run
//! use strata::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.logging.init(None)?;
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::limits::{GridConfig, LimitsConfig};
use super::logging::LoggingConfig;
use crate::adapter::outbound::binance::settings::{BinanceConfig, Environment};
use crate::error::{ConfigError, Result};

/// Environment variable that selects testnet (`true`) or production (`false`).
pub const TESTNET_VAR: &str = "BINANCE_TESTNET";

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Exchange connection settings.
    #[serde(default)]
    pub exchange: BinanceConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Validator bounds.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Grid placement settings.
    #[serde(default)]
    pub grid: GridConfig,
}

impl Config {
    /// Parse configuration from TOML content and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or fails
    /// validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise use built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// `BINANCE_TESTNET=false` selects production; any other non-empty value
    /// selects testnet.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(TESTNET_VAR).filter(|v| !v.trim().is_empty()) {
            self.exchange.environment = if value.trim().eq_ignore_ascii_case("false") {
                Environment::Production
            } else {
                Environment::Testnet
            };
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        self.exchange.validate()?;
        self.logging.validate()?;
        self.limits.validate()?;
        self.grid.validate()?;
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                field: "config",
                reason: e.to_string(),
            }
            .into()
        })
    }
}
