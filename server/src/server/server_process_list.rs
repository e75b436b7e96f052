use std::time::Duration;

use tether_shared::{
    AdvanceReport, ConnectionKey, InputSource, Process, ProcessError, ProcessKey, ProcessList,
    TickConfig,
};

use crate::events::TickEvents;

/// Authority-side process list. Every participant runs once per whole tick,
/// in dependency order, and controlled participants consume their
/// controller's buffered input.
pub struct ServerProcessList<P: Process> {
    list: ProcessList<P>,
    tick_events: TickEvents,
}

impl<P: Process> ServerProcessList<P> {
    pub fn new(config: &TickConfig) -> Self {
        Self {
            list: ProcessList::new(config),
            tick_events: TickEvents::new(),
        }
    }

    // Participants

    pub fn add(&mut self, participant: P) -> ProcessKey {
        self.list.add_participant(participant)
    }

    pub fn remove(&mut self, key: &ProcessKey) -> Result<Option<P>, ProcessError> {
        self.list.remove_participant(key)
    }

    pub fn set_dependency(&mut self, key: &ProcessKey, after: Option<ProcessKey>) -> Result<(), ProcessError> {
        self.list.set_dependency(key, after)
    }

    pub fn set_controller(&mut self, key: &ProcessKey, controller: Option<ConnectionKey>) -> Result<(), ProcessError> {
        self.list.set_controller(key, controller)
    }

    pub fn get(&self, key: &ProcessKey) -> Option<&P> {
        self.list.get(key)
    }

    pub fn get_mut(&mut self, key: &ProcessKey) -> Option<&mut P> {
        self.list.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    // Time

    /// Runs every whole tick owed for `elapsed` and records each processed
    /// tick as an event.
    pub fn advance<S: InputSource<P::Input>>(
        &mut self,
        elapsed: Duration,
        world: &mut P::World,
        inputs: &mut S,
    ) -> AdvanceReport {
        let mut tick = self.list.current_tick();
        let report = self.list.advance(elapsed, world, inputs);
        for _ in 0..report.ticks {
            tick = tick.wrapping_add(1);
            self.tick_events.push_tick(tick);
        }
        report
    }

    pub fn take_tick_events(&mut self) -> TickEvents {
        std::mem::take(&mut self.tick_events)
    }

    pub fn tick_events_mut(&mut self) -> &mut TickEvents {
        &mut self.tick_events
    }

    pub fn list(&self) -> &ProcessList<P> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ProcessList<P> {
        &mut self.list
    }
}
