use std::vec::IntoIter;

use tether_shared::Tick;

pub struct TickEvents {
    simulated_ticks: Vec<Tick>,
    predicted_ticks: Vec<Tick>,
    empty: bool,
}

impl Default for TickEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl TickEvents {
    pub(crate) fn new() -> Self {
        Self {
            simulated_ticks: Vec::new(),
            predicted_ticks: Vec::new(),
            empty: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: TickEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: TickEvent>(&self) -> bool {
        V::has(self)
    }

    pub fn clear(&mut self) {
        self.simulated_ticks.clear();
        self.predicted_ticks.clear();
        self.empty = true;
    }

    pub(crate) fn push_simulated_tick(&mut self, tick: Tick) {
        self.simulated_ticks.push(tick);
        self.empty = false;
    }

    pub(crate) fn push_predicted_tick(&mut self, tick: Tick) {
        self.predicted_ticks.push(tick);
        self.empty = false;
    }
}

// Event Trait
pub trait TickEvent {
    type Iter;

    fn iter(events: &mut TickEvents) -> Self::Iter;

    fn has(events: &TickEvents) -> bool;
}

// Simulated Tick Event
/// A whole tick ran for every participant.
pub struct SimulatedTickEvent;
impl TickEvent for SimulatedTickEvent {
    type Iter = IntoIter<Tick>;

    fn iter(events: &mut TickEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.simulated_ticks);
        IntoIterator::into_iter(list)
    }

    fn has(events: &TickEvents) -> bool {
        !events.simulated_ticks.is_empty()
    }
}

// Predicted Tick Event
/// Only the locally controlled participant ran, to apply input between
/// whole ticks. Carries the last whole tick.
pub struct PredictedTickEvent;
impl TickEvent for PredictedTickEvent {
    type Iter = IntoIter<Tick>;

    fn iter(events: &mut TickEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.predicted_ticks);
        IntoIterator::into_iter(list)
    }

    fn has(events: &TickEvents) -> bool {
        !events.predicted_ticks.is_empty()
    }
}
