use std::time::Duration;

use log::{trace, warn};

use tether_shared::{
    AdvanceReport, ConnectionKey, InputSource, Process, ProcessError, ProcessKey, ProcessList,
    TickConfig,
};

use crate::{link_status::LinkStatus, tick_events::TickEvents};

/// Controller key of the participant driven by local input.
pub const LOCAL_CONTROLLER: ConnectionKey = ConnectionKey::from_u64(0);

/// Observer-side process list. Runs whole ticks like the server does, but
/// also predicts the locally controlled participant between ticks,
/// interpolates every participant within the current tick, and stops time
/// entirely while the link is backlogged.
pub struct ClientProcessList<P: Process> {
    list: ProcessList<P>,
    control: Option<ProcessKey>,
    tick_events: TickEvents,
}

impl<P: Process> ClientProcessList<P> {
    pub fn new(config: &TickConfig) -> Self {
        Self {
            list: ProcessList::new(config),
            control: None,
            tick_events: TickEvents::new(),
        }
    }

    // Participants

    pub fn add(&mut self, participant: P) -> ProcessKey {
        self.list.add_participant(participant)
    }

    pub fn remove(&mut self, key: &ProcessKey) -> Result<Option<P>, ProcessError> {
        if self.control == Some(*key) {
            self.control = None;
        }
        self.list.remove_participant(key)
    }

    pub fn set_dependency(&mut self, key: &ProcessKey, after: Option<ProcessKey>) -> Result<(), ProcessError> {
        self.list.set_dependency(key, after)
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

    // Control

    /// Makes `key` the participant fed by local input, releasing any previous
    /// one.
    pub fn set_control(&mut self, key: &ProcessKey) -> Result<(), ProcessError> {
        self.list.set_controller(key, Some(LOCAL_CONTROLLER))?;
        if let Some(previous) = self.control.replace(*key) {
            if previous != *key && self.list.contains(&previous) {
                self.list.set_controller(&previous, None)?;
            }
        }
        Ok(())
    }

    pub fn clear_control(&mut self) {
        if let Some(previous) = self.control.take() {
            if self.list.contains(&previous) {
                let _ = self.list.set_controller(&previous, None);
            }
        }
    }

    /// The locally controlled participant, if it is still alive.
    pub fn control(&self) -> Option<ProcessKey> {
        self.control.filter(|key| self.list.contains(key))
    }

    // Time

    /// Advances local time by `elapsed`.
    ///
    /// While `source` reports a backlogged link, time is frozen: the clock
    /// jumps forward without running any tick. Otherwise every whole tick owed
    /// runs, or, if none is owed but local input is waiting, only the
    /// controlled participant runs on that input. Every participant is then
    /// interpolated to the fraction of a tick left and animated by `elapsed`.
    pub fn advance<S: InputSource<P::Input> + LinkStatus>(
        &mut self,
        elapsed: Duration,
        world: &mut P::World,
        source: &mut S,
    ) -> AdvanceReport {
        if self.list.is_dirty() {
            self.list.reorder();
        }

        if source.is_backlogged() {
            self.list.clock_mut().freeze(elapsed);
            trace!("ClientProcessList: link backlogged, time frozen");
            return AdvanceReport {
                ticks: 0,
                delta: self.list.clock().delta(),
                frozen: true,
            };
        }

        let plan = self.list.clock().plan(elapsed);
        let control = self.control();
        let control_pending = control.is_some() && source.has_pending(&LOCAL_CONTROLLER);

        if plan.ticks > 0 || control_pending {
            self.list.reset_interpolation();
        }

        if plan.ticks == 0 {
            if let (Some(key), true) = (control, control_pending) {
                let input = source.next_input(&LOCAL_CONTROLLER);
                match self.list.tick_participant(&key, input, world) {
                    Ok(()) => self.tick_events.push_predicted_tick(self.list.current_tick()),
                    Err(error) => warn!("ClientProcessList: prediction skipped: {}", error),
                }
            }
        }

        for _ in 0..plan.ticks {
            self.list.clock_mut().complete_tick();
            self.list.tick_all(world, source);
            self.tick_events.push_simulated_tick(self.list.current_tick());
        }
        self.list.clock_mut().finish(&plan);

        let delta = self.list.clock().delta();
        self.list.interpolate_all(delta);
        self.list.animate_all(elapsed.as_secs_f32());

        AdvanceReport {
            ticks: plan.ticks,
            delta,
            frozen: false,
        }
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
