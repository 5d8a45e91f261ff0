//! Simulated [`Clock`] for tests that must never sleep in real time.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::port::Clock;

/// 2024-01-01T00:00:00Z.
const EPOCH_SECS: i64 = 1_704_067_200;

/// Virtual clock: `sleep` advances simulated time and returns at once.
///
/// Optionally cancels a token once a given number of sleeps has elapsed,
/// which simulates an operator interrupt between two child orders.
pub struct VirtualClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<Duration>>,
    cancel_after: Mutex<Option<(usize, CancellationToken)>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(DateTime::from_timestamp(EPOCH_SECS, 0).unwrap_or_default()),
            sleeps: Mutex::new(Vec::new()),
            cancel_after: Mutex::new(None),
        }
    }

    /// Cancel `token` when the `sleeps`-th sleep completes.
    #[must_use]
    pub fn cancel_after(self, sleeps: usize, token: CancellationToken) -> Self {
        *self.cancel_after.lock() = Some((sleeps, token));
        self
    }

    /// Durations passed to `sleep`, in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }

    /// Total simulated time slept.
    pub fn elapsed(&self) -> Duration {
        self.sleeps.lock().iter().sum()
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for VirtualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    async fn sleep(&self, duration: Duration) {
        let count = {
            let mut sleeps = self.sleeps.lock();
            sleeps.push(duration);
            sleeps.len()
        };
        if let Ok(step) = chrono::Duration::from_std(duration) {
            let mut now = self.now.lock();
            *now += step;
        }
        if let Some((after, token)) = self.cancel_after.lock().as_ref() {
            if count >= *after {
                token.cancel();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_ready, task};

    #[test]
    fn sleep_completes_on_first_poll_and_advances_time() {
        let clock = VirtualClock::new();
        let start = clock.now();

        let mut sleep = task::spawn(clock.sleep(Duration::from_secs(90)));
        assert_ready!(sleep.poll());
        drop(sleep);

        assert_eq!(clock.now() - start, chrono::Duration::seconds(90));
        assert_eq!(clock.elapsed(), Duration::from_secs(90));
    }

    #[test]
    fn cancel_after_fires_on_the_nth_sleep() {
        let token = CancellationToken::new();
        let clock = VirtualClock::new().cancel_after(2, token.clone());

        tokio_test::block_on(clock.sleep(Duration::from_secs(1)));
        assert!(!token.is_cancelled());
        tokio_test::block_on(clock.sleep(Duration::from_secs(1)));
        assert!(token.is_cancelled());
    }
}
