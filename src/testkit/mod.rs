//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`gateway`] - [`ScriptedGateway`], an in-memory exchange with
//!   scripted prices and per-submission failures.
//! - [`clock`] - [`VirtualClock`], simulated time that never sleeps.
//! - [`notifier`] - [`RecordingNotifier`], collects emitted events.
//! - [`domain`] - Builders for validated request types.

pub mod clock;
pub mod domain;
pub mod gateway;
pub mod notifier;

pub use clock::VirtualClock;
pub use gateway::{ScriptedGateway, Submission};
pub use notifier::RecordingNotifier;
