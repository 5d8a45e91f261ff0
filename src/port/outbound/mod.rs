//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! - [`exchange`] - order submission and price queries
//! - [`notifier`] - progress and outcome events
//! - [`clock`] - wall time and inter-order waits

pub mod clock;
pub mod exchange;
pub mod notifier;
