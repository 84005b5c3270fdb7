//! Cancellable fixed-rate timer that paces the game.
//!
//! A [`TickDriver`] holds at most one interval. Arming replaces whatever was
//! there, so a restart can never leave two tick streams behind.

use std::future;
use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct TickDriver {
    period: Duration,
    interval: Option<Interval>,
}

impl TickDriver {
    pub fn new(period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(Error::InvalidTickInterval);
        }
        Ok(TickDriver { period, interval: None })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Starts ticking one full period from now, dropping any previous timer.
    pub fn arm(&mut self) {
        self.disarm();

        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);

        debug!(period_ms = self.period.as_millis() as u64, "tick driver armed");
    }

    pub fn disarm(&mut self) {
        if self.interval.take().is_some() {
            debug!("tick driver disarmed");
        }
    }

    /// Waits for the next tick. Never resolves while disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => future::pending().await,
        }
    }
}
