//! Wall clock backed by the Tokio timer.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::port::Clock;

/// Production [`Clock`]: system time and `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
