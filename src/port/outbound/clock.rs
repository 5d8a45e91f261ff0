//! Clock port.
//!
//! The TWAP executor reads time and waits between child orders only through
//! this trait, so tests can substitute simulated time.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of wall time and timed waits.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Suspend the caller for `duration`.
    ///
    /// Must be cancel-safe: executors race this future against a
    /// cancellation token and drop it when the token fires.
    async fn sleep(&self, duration: Duration);
}
