//! Binance USDT-M futures integration.

pub mod client;
pub mod credentials;
pub mod dto;
pub mod settings;

pub use client::BinanceClient;
pub use credentials::Credentials;
pub use settings::{BinanceConfig, Environment};
