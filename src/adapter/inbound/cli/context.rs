//! Per-invocation wiring shared by the command handlers.

use std::sync::Arc;

use tracing::debug;

use super::command::Cli;
use super::console::ConsoleNotifier;
use crate::adapter::outbound::binance::{BinanceClient, Credentials, Environment};
use crate::application::validator::Validator;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::{ExchangeGateway, LogNotifier, Notifier, NotifierRegistry};

/// Effective configuration plus the collaborators built from it.
pub struct Context {
    pub config: Config,
    pub validator: Validator,
}

impl Context {
    /// Load the config file (defaults when missing), then apply the
    /// environment and command-line endpoint overrides in that order.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = Config::load_or_default(&cli.config)?;
        config.apply_env(|name| std::env::var(name).ok());
        if cli.testnet {
            config.exchange.environment = Environment::Testnet;
        } else if cli.production {
            config.exchange.environment = Environment::Production;
        }
        Ok(Self::from_config(config))
    }

    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let validator = Validator::new(config.limits.clone().into());
        Self { config, validator }
    }

    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.config.exchange.environment
    }

    /// Client for public endpoints only.
    #[must_use]
    pub fn public_client(&self) -> BinanceClient {
        BinanceClient::from_config(&self.config.exchange)
    }

    /// Gateway able to sign order requests. Fails when the API key pair is
    /// missing from the environment.
    pub fn gateway(&self) -> Result<Arc<dyn ExchangeGateway>> {
        let credentials = Credentials::from_env()?;
        debug!(credentials = ?credentials, environment = %self.environment(), "Building signed client");
        Ok(Arc::new(self.public_client().with_credentials(credentials)))
    }

    /// Console progress plus structured log lines.
    #[must_use]
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(ConsoleNotifier::new()));
        registry.register(Box::new(LogNotifier));
        Arc::new(registry)
    }
}
