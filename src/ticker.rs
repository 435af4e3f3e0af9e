//! Periodic trigger for game ticks
//!
//! The engine never sleeps or schedules anything itself; the interactive loop
//! awaits a [`Ticker`] and calls into the session when it fires.

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Fires once per period, first after one full period
pub struct Ticker {
    interval: Interval,
    period: Duration,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            interval: Self::build(period),
            period,
        }
    }

    fn build(period: Duration) -> Interval {
        let mut interval = interval_at(Instant::now() + period, period);
        // A slow frame should delay the snake, not make it jump several cells.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }

    /// Wait for the next tick
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    /// Cancel the pending tick and restart at `period`
    pub fn reschedule(&mut self, period: Duration) {
        self.period = period;
        self.interval = Self::build(period);
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
