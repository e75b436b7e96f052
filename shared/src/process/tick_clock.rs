use std::time::Duration;

use crate::TickConfig;

/// Whole ticks owed for a given elapsed time, computed by `TickClock::plan`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickPlan {
    pub ticks: u64,
    target_time: u64,
    target_tick: u64,
}

/// Accumulates elapsed wall time and converts it into whole fixed ticks.
///
/// Time is kept in nanoseconds. `tick_time` is always a whole multiple of the
/// tick length, so splitting the same total elapsed time over any number of
/// calls produces the same tick count.
#[derive(Clone, Debug)]
pub struct TickClock {
    tick_nanos: u64,
    time: u64,
    tick_time: u64,
}

impl TickClock {
    pub fn new(config: &TickConfig) -> Self {
        Self {
            tick_nanos: config.tick_nanos(),
            time: 0,
            tick_time: 0,
        }
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_nanos(self.tick_nanos)
    }

    /// Total time accounted for so far, frozen time included.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.time)
    }

    pub fn plan(&self, elapsed: Duration) -> TickPlan {
        let target_time = self.time.saturating_add(elapsed.as_nanos() as u64);
        let target_tick = target_time - (target_time % self.tick_nanos);
        TickPlan {
            ticks: (target_tick - self.tick_time) / self.tick_nanos,
            target_time,
            target_tick,
        }
    }

    /// Records one whole tick as processed.
    pub fn complete_tick(&mut self) {
        self.tick_time += self.tick_nanos;
    }

    /// Moves the clock to the end of `plan`, once all its ticks completed.
    pub fn finish(&mut self, plan: &TickPlan) {
        debug_assert_eq!(self.tick_time, plan.target_tick);
        self.time = plan.target_time;
        self.tick_time = plan.target_tick;
    }

    /// Lets `elapsed` pass without processing the ticks it contains.
    pub fn freeze(&mut self, elapsed: Duration) {
        let plan = self.plan(elapsed);
        self.time = plan.target_time;
        self.tick_time = plan.target_tick;
    }

    /// Fraction of a tick remaining until the next tick boundary.
    pub fn delta(&self) -> f32 {
        let remaining = (self.tick_nanos - (self.time % self.tick_nanos)) % self.tick_nanos;
        (remaining as f64 / self.tick_nanos as f64) as f32
    }
}
