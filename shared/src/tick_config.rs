use std::{default::Default, time::Duration};

/// Contains Config properties describing the fixed simulation step, shared by
/// both the Server and the Client
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickConfig {
    /// Length of one simulation tick. Fixed for the lifetime of a process
    /// list; both sides of a connection must agree on it.
    pub tick_duration: Duration,
}

impl TickConfig {
    pub const DEFAULT_TICK_MILLIS: u64 = 32;

    pub fn new(tick_duration: Duration) -> Self {
        Self { tick_duration }
    }

    pub(crate) fn tick_nanos(&self) -> u64 {
        // a zero-length tick would never let time advance past a tick boundary
        (self.tick_duration.as_nanos() as u64).max(1)
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_duration: Duration::from_millis(Self::DEFAULT_TICK_MILLIS),
        }
    }
}
