//! Strata - order-strategy execution for USDT-margined futures.
//!
//! Splits large orders over time (TWAP), lays static limit-order ladders
//! across a price range (grid), and places paired take-profit / stop-loss
//! orders, all through a single exchange gateway.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - plans, ladders and reports; pure data and arithmetic
//! - [`port`] - traits the application depends on (exchange, clock, notifier)
//! - [`application`] - validator, TWAP executor, grid planner, bracket placer
//! - [`adapter`] - Binance REST gateway, Tokio clock, `strata` CLI
//! - [`infrastructure`] - configuration loading and logging setup
//! - [`error`] - error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rust_decimal_macros::dec;
//! use strata::adapter::outbound::binance::{BinanceClient, Credentials};
//! use strata::adapter::outbound::clock::TokioClock;
//! use strata::application::{TwapExecutor, Validator};
//! use strata::port::LogNotifier;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> strata::error::Result<()> {
//! let params = Validator::default().twap("BTCUSDT", "buy", dec!(0.1), 5, 10)?;
//! let gateway = BinanceClient::new("https://testnet.binancefuture.com")
//!     .with_credentials(Credentials::from_env()?);
//!
//! let executor = TwapExecutor::new(Arc::new(gateway), Arc::new(TokioClock), Arc::new(LogNotifier));
//! let report = executor.run(&params, &CancellationToken::new()).await?;
//! println!("filled {} of {}", report.executed_quantity(), report.target_quantity());
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `testkit` - scripted gateway, virtual clock and recording notifier for
//!   tests

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
