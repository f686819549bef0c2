//! Per-session inactivity timeout.

use std::time::Duration;
use tokio::time::Instant;

/// Inactivity timer for one session.
///
/// Two states: armed (counting down to a monotonic deadline) and fired.
/// Rearming replaces the deadline, so an expiry that raced a just-processed
/// line is never honored. Fires at most once per session.
pub struct Watchdog {
    period: Duration,
    deadline: Instant,
    fired: bool,
}

impl Watchdog {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: Instant::now() + period,
            fired: false,
        }
    }

    /// Push the deadline a full period into the future, discarding any
    /// pending expiry.
    pub fn rearm(&mut self) {
        self.deadline = Instant::now() + self.period;
    }

    /// Resolves once the deadline passes without a rearm. After firing the
    /// watchdog stays silent.
    pub async fn expired(&mut self) {
        if self.fired {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep_until(self.deadline).await;
        self.fired = true;
    }
}
