use crate::{ConnectionKey, Tick};

use super::{error::ProcessError, process::Process, process_key::ProcessKey, process_list::ProcessList};

/// Handed to `Process::on_tick`. Gives the ticking participant access to the
/// world and lets it change the process list mid-tick: participants it removes
/// are never ticked again, including later ones in the current tick, and
/// participants it adds start ticking on the next tick.
pub struct ProcessContext<'a, P: Process> {
    list: &'a mut ProcessList<P>,
    world: &'a mut P::World,
    key: ProcessKey,
}

impl<'a, P: Process> ProcessContext<'a, P> {
    pub(crate) fn new(list: &'a mut ProcessList<P>, world: &'a mut P::World, key: ProcessKey) -> Self {
        Self { list, world, key }
    }

    /// Key of the participant being ticked.
    pub fn key(&self) -> ProcessKey {
        self.key
    }

    /// The tick being processed.
    pub fn tick(&self) -> Tick {
        self.list.current_tick()
    }

    pub fn world(&mut self) -> &mut P::World {
        &mut *self.world
    }

    pub fn add(&mut self, participant: P) -> ProcessKey {
        self.list.add_participant(participant)
    }

    /// Removes any participant, this one included. Returns the participant
    /// unless it is the one being ticked, which is dropped once its callback
    /// returns.
    pub fn remove(&mut self, key: &ProcessKey) -> Result<Option<P>, ProcessError> {
        self.list.remove_participant(key)
    }

    /// Whether the ticking participant has removed itself.
    pub fn is_removed(&self) -> bool {
        !self.list.contains(&self.key)
    }

    pub fn set_dependency(&mut self, key: &ProcessKey, after: Option<ProcessKey>) -> Result<(), ProcessError> {
        self.list.set_dependency(key, after)
    }

    pub fn set_controller(&mut self, key: &ProcessKey, controller: Option<ConnectionKey>) -> Result<(), ProcessError> {
        self.list.set_controller(key, controller)
    }

    /// Other participants. The one being ticked is not reachable through here.
    pub fn get(&self, key: &ProcessKey) -> Option<&P> {
        self.list.get(key)
    }

    pub fn get_mut(&mut self, key: &ProcessKey) -> Option<&mut P> {
        self.list.get_mut(key)
    }
}
