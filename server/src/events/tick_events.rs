use std::vec::IntoIter;

use tether_shared::Tick;

/// Ticks the server processed since the events were last read.
#[derive(Default)]
pub struct TickEvents {
    ticks: Vec<Tick>,
}

impl TickEvents {
    pub(crate) fn new() -> Self {
        Self { ticks: Vec::new() }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn read(&mut self) -> IntoIter<Tick> {
        std::mem::take(&mut self.ticks).into_iter()
    }

    // Crate-public

    pub(crate) fn push_tick(&mut self, tick: Tick) {
        self.ticks.push(tick);
    }
}
