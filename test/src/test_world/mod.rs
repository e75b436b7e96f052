/// Simple worlds for participants to act on in tests

use tether_shared::Tick;

// TestEntity - Simple u64-based entity
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct TestEntity(u64);

impl TestEntity {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

// Journal - what participants did, in the order they did it
#[derive(Default, Debug)]
pub struct Journal {
    pub ticks: Vec<(Tick, &'static str)>,
    pub inputs: Vec<(&'static str, u32)>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names in the order they were ticked during `tick`.
    pub fn ticked_on(&self, tick: Tick) -> Vec<&'static str> {
        self.ticks
            .iter()
            .filter(|(t, _)| *t == tick)
            .map(|(_, name)| *name)
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.ticks.iter().filter(|(_, n)| *n == name).count()
    }
}
