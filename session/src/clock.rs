//! Pacing of simulation ticks.

use std::{future::Future, time::Duration};

use tokio::time::{self, Interval, MissedTickBehavior};

/// Source of the instants at which the session resolves a tick.
pub trait TickClock {
    /// Completes when the next tick is due.
    fn next_tick(&mut self) -> impl Future<Output = ()> + Send;

    /// Restarts the cadence so the next tick is due immediately.
    fn restart(&mut self);
}

/// Wall-clock ticks spaced by a fixed period.
#[derive(Debug)]
pub struct IntervalClock {
    interval: Interval,
}

impl IntervalClock {
    /// Creates a clock ticking every `period`, starting immediately.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        let mut interval = time::interval(period.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    /// Time between two ticks.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

impl TickClock for IntervalClock {
    fn next_tick(&mut self) -> impl Future<Output = ()> + Send {
        async move {
            let _ = self.interval.tick().await;
        }
    }

    fn restart(&mut self) {
        self.interval.reset_immediately();
    }
}

/// Clock whose ticks are always due; counts how many were taken.
#[derive(Debug, Default)]
pub struct ManualClock {
    ticks: u64,
    restarts: u64,
}

impl ManualClock {
    /// Creates a clock that has not ticked yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks handed out so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of times the cadence was restarted.
    #[must_use]
    pub const fn restarts(&self) -> u64 {
        self.restarts
    }
}

impl TickClock for ManualClock {
    fn next_tick(&mut self) -> impl Future<Output = ()> + Send {
        self.ticks += 1;
        std::future::ready(())
    }

    fn restart(&mut self) {
        self.restarts += 1;
    }
}
