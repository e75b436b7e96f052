use std::time::Duration;

use log::{debug, info, trace};

use crate::{
    index_list::{IndexList, Link},
    ConnectionKey, Tick, TickConfig,
};

use super::{
    error::ProcessError, input_source::InputSource, process::Process,
    process_context::ProcessContext, process_key::ProcessKey, tick_clock::TickClock,
};

/// Whether the live order still honors every "process after" dependency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderState {
    Clean,
    /// A participant was added or removed, or a dependency changed, since the
    /// last reorder.
    Dirty,
}

/// Result of one call to `advance`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdvanceReport {
    /// Whole ticks processed.
    pub ticks: u64,
    /// Fraction of a tick left until the next tick boundary.
    pub delta: f32,
    /// Time was frozen instead of advanced.
    pub frozen: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Membership {
    Live,
    /// Not yet ticked during the tick in progress.
    Pending,
}

struct ProcessNode<P> {
    // None while the participant's own callback is running
    participant: Option<P>,
    membership: Membership,
    tag: u32,
    after: Option<ProcessKey>,
    order_key: u64,
    controller: Option<ConnectionKey>,
    last_delta: f32,
}

struct Slot<P> {
    generation: u32,
    node: Option<ProcessNode<P>>,
}

/// All participants of one simulation role, kept in an order where each
/// participant comes after the one it depends on.
///
/// Participants live in an arena; the order is an intrusive list threaded
/// through it by index. During a tick the live list is moved wholesale onto a
/// pending list and every participant is re-linked onto the live list right
/// before its `on_tick` runs, so callbacks can remove any participant without
/// corrupting the walk.
pub struct ProcessList<P: Process> {
    slots: Vec<Slot<P>>,
    links: Vec<Link>,
    free_slots: Vec<usize>,
    live: IndexList,
    pending: IndexList,
    order_state: OrderState,
    current_tag: u32,
    next_order_key: u64,
    clock: TickClock,
    total_ticks: u64,
    tick: Tick,
}

impl<P: Process> ProcessList<P> {
    pub fn new(config: &TickConfig) -> Self {
        Self {
            slots: Vec::new(),
            links: Vec::new(),
            free_slots: Vec::new(),
            live: IndexList::new(),
            pending: IndexList::new(),
            order_state: OrderState::Clean,
            current_tag: 0,
            next_order_key: 0,
            clock: TickClock::new(config),
            total_ticks: 0,
            tick: 0,
        }
    }

    // Participants

    /// Adds a participant at the end of the order. It is first ticked on the
    /// next tick that starts after this call.
    pub fn add_participant(&mut self, participant: P) -> ProcessKey {
        let node = ProcessNode {
            participant: Some(participant),
            membership: Membership::Live,
            tag: 0,
            after: None,
            order_key: self.next_order_key,
            controller: None,
            last_delta: 0.0,
        };
        self.next_order_key += 1;

        let index = match self.free_slots.pop() {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.links.push(Link::default());
                self.slots.len() - 1
            }
        };
        self.live.push_back(&mut self.links, index);
        self.order_state = OrderState::Dirty;

        let key = ProcessKey::new(index, self.slots[index].generation);
        trace!("ProcessList: added participant {:?}", key);
        key
    }

    /// Removes a participant, returning it. Returns `Ok(None)` when called on
    /// the participant whose `on_tick` is running; it is dropped once that
    /// callback returns.
    pub fn remove_participant(&mut self, key: &ProcessKey) -> Result<Option<P>, ProcessError> {
        let index = self.index_of(key).ok_or_else(|| not_found(key))?;
        let slot = &mut self.slots[index];
        let Some(node) = slot.node.take() else {
            return Err(not_found(key));
        };
        slot.generation = slot.generation.wrapping_add(1);

        match node.membership {
            Membership::Live => self.live.remove(&mut self.links, index),
            Membership::Pending => self.pending.remove(&mut self.links, index),
        }
        self.free_slots.push(index);
        self.order_state = OrderState::Dirty;

        trace!("ProcessList: removed participant {:?}", key);
        Ok(node.participant)
    }

    pub fn contains(&self, key: &ProcessKey) -> bool {
        self.index_of(key).is_some()
    }

    pub fn get(&self, key: &ProcessKey) -> Option<&P> {
        self.node(key)?.participant.as_ref()
    }

    pub fn get_mut(&mut self, key: &ProcessKey) -> Option<&mut P> {
        self.node_mut(key)?.participant.as_mut()
    }

    pub fn len(&self) -> usize {
        self.live.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes `key` process after `after` (or after nothing in particular).
    /// Dependency cycles are accepted; reordering collapses them into some
    /// order that still contains every participant once.
    pub fn set_dependency(&mut self, key: &ProcessKey, after: Option<ProcessKey>) -> Result<(), ProcessError> {
        if let Some(target) = after {
            if !self.contains(&target) {
                return Err(ProcessError::DependencyNotFound {
                    key: format!("{:?}", key),
                    target: format!("{:?}", target),
                });
            }
        }
        let node = self.node_mut(key).ok_or_else(|| not_found(key))?;
        if node.after == after {
            return Ok(());
        }
        node.after = after;
        self.order_state = OrderState::Dirty;

        if self.closes_cycle(key) {
            debug!(
                "ProcessList: dependency of {:?} on {:?} closes a cycle, it will be collapsed on reorder",
                key, after
            );
        }
        Ok(())
    }

    pub fn dependency(&self, key: &ProcessKey) -> Option<ProcessKey> {
        self.node(key)?.after
    }

    /// Hands control of a participant to a connection, whose queued inputs are
    /// then fed to it one per tick.
    pub fn set_controller(&mut self, key: &ProcessKey, controller: Option<ConnectionKey>) -> Result<(), ProcessError> {
        let node = self.node_mut(key).ok_or_else(|| not_found(key))?;
        node.controller = controller;
        if let Some(controller) = controller {
            info!("ProcessList: {:?} now controlled by connection {}", key, controller.to_u64());
        }
        Ok(())
    }

    pub fn controller(&self, key: &ProcessKey) -> Option<ConnectionKey> {
        self.node(key)?.controller
    }

    // Ordering

    pub fn order_state(&self) -> OrderState {
        self.order_state
    }

    pub fn is_dirty(&self) -> bool {
        self.order_state == OrderState::Dirty
    }

    /// Participants in the order they will next be ticked.
    pub fn ordered_keys(&self) -> Vec<ProcessKey> {
        self.live
            .iter(&self.links)
            .chain(self.pending.iter(&self.links))
            .map(|index| ProcessKey::new(index, self.slots[index].generation))
            .collect()
    }

    /// Rebuilds the live order so every participant follows the one it
    /// depends on.
    ///
    /// Participants are first laid out by insertion order. Then the head is
    /// repeatedly popped and tagged with the current generation; if its
    /// dependency is untagged, the dependency chain is followed, pulling each
    /// untagged link out of the working list, and the chain is emitted deepest
    /// first ahead of the popped participant. A tagged link ends the chain, so
    /// each participant is emitted exactly once even when dependencies loop.
    pub fn reorder(&mut self) {
        self.next_generation();
        let tag = self.current_tag;

        let mut order: Vec<usize> = self.live.iter(&self.links).collect();
        order.sort_by_key(|index| self.order_key_at(*index));

        let mut old_live = self.live.detach();
        while old_live.pop_front(&mut self.links).is_some() {}

        let mut working = IndexList::new();
        for index in &order {
            working.push_back(&mut self.links, *index);
        }

        let mut chain = Vec::new();
        while let Some(index) = working.pop_front(&mut self.links) {
            self.set_tag(index, tag);

            chain.clear();
            let mut after = self.after_index(index);
            while let Some(target) = after {
                if self.tag_at(target) == tag {
                    break;
                }
                self.set_tag(target, tag);
                working.remove(&mut self.links, target);
                chain.push(target);
                after = self.after_index(target);
            }

            for target in chain.iter().rev() {
                self.live.push_back(&mut self.links, *target);
            }
            self.live.push_back(&mut self.links, index);
        }

        self.order_state = OrderState::Clean;
        debug!("ProcessList: reordered {} participants", self.live.len());
    }

    // Ticking

    /// Authority-side advance: reorders if needed, then runs every whole tick
    /// owed for `elapsed`, feeding controlled participants from `inputs`.
    pub fn advance<S: InputSource<P::Input>>(
        &mut self,
        elapsed: Duration,
        world: &mut P::World,
        inputs: &mut S,
    ) -> AdvanceReport {
        let plan = self.clock.plan(elapsed);
        for _ in 0..plan.ticks {
            self.clock.complete_tick();
            self.tick_all(world, inputs);
        }
        self.clock.finish(&plan);

        AdvanceReport {
            ticks: plan.ticks,
            delta: self.clock.delta(),
            frozen: false,
        }
    }

    /// Runs one full tick over every participant in order.
    pub fn tick_all<S: InputSource<P::Input>>(&mut self, world: &mut P::World, inputs: &mut S) {
        if self.is_dirty() {
            self.reorder();
        }

        self.total_ticks += 1;
        self.tick = self.tick.wrapping_add(1);
        trace!("ProcessList: tick {} ({} participants)", self.tick, self.live.len());

        self.pending = self.live.detach();
        let mut cursor = self.pending.head();
        while let Some(index) = cursor {
            cursor = self.links[index].next();
            if let Some(node) = self.slots[index].node.as_mut() {
                node.membership = Membership::Pending;
            }
        }

        while let Some(index) = self.pending.pop_front(&mut self.links) {
            self.live.push_back(&mut self.links, index);
            let key = ProcessKey::new(index, self.slots[index].generation);
            let Some(node) = self.slots[index].node.as_mut() else {
                continue;
            };
            node.membership = Membership::Live;

            let input = match node.controller {
                Some(controller) => inputs.next_input(&controller),
                None => None,
            };
            self.run_tick(key, input, world);
        }
    }

    /// Ticks a single participant outside of a full tick, without moving the
    /// tick counters. Used by observers to apply local input immediately.
    pub fn tick_participant(
        &mut self,
        key: &ProcessKey,
        input: Option<P::Input>,
        world: &mut P::World,
    ) -> Result<(), ProcessError> {
        if !self.contains(key) {
            return Err(not_found(key));
        }
        self.run_tick(*key, input, world);
        Ok(())
    }

    /// Snaps every participant that is currently blended between ticks back
    /// onto its last whole tick.
    pub fn reset_interpolation(&mut self) {
        let mut cursor = self.live.head();
        while let Some(index) = cursor {
            cursor = self.links[index].next();
            let Some(node) = self.slots[index].node.as_mut() else {
                continue;
            };
            if node.last_delta != 0.0 {
                node.last_delta = 0.0;
                if let Some(participant) = node.participant.as_mut() {
                    participant.on_interpolate(0.0);
                }
            }
        }
    }

    pub fn interpolate_all(&mut self, delta: f32) {
        let mut cursor = self.live.head();
        while let Some(index) = cursor {
            cursor = self.links[index].next();
            let Some(node) = self.slots[index].node.as_mut() else {
                continue;
            };
            node.last_delta = delta;
            if let Some(participant) = node.participant.as_mut() {
                participant.on_interpolate(delta);
            }
        }
    }

    pub fn animate_all(&mut self, elapsed_seconds: f32) {
        let mut cursor = self.live.head();
        while let Some(index) = cursor {
            cursor = self.links[index].next();
            if let Some(participant) = self.slots[index]
                .node
                .as_mut()
                .and_then(|node| node.participant.as_mut())
            {
                participant.on_animate(elapsed_seconds);
            }
        }
    }

    pub fn last_delta(&self, key: &ProcessKey) -> Option<f32> {
        Some(self.node(key)?.last_delta)
    }

    // Time

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut TickClock {
        &mut self.clock
    }

    /// Ticks processed since creation, never wraps in practice.
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// The wrapping tick number of the tick in progress, or of the last tick
    /// processed.
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    // Private

    fn run_tick(&mut self, key: ProcessKey, input: Option<P::Input>, world: &mut P::World) {
        let index = key.index();
        let Some(mut participant) = self.slots[index]
            .node
            .as_mut()
            .and_then(|node| node.participant.take())
        else {
            return;
        };

        {
            let mut context = ProcessContext::new(self, world, key);
            participant.on_tick(input, &mut context);
        }

        // the participant may have removed itself, and its slot been reused
        if let Some(node) = self.node_mut(&key) {
            node.participant = Some(participant);
        }
    }

    fn index_of(&self, key: &ProcessKey) -> Option<usize> {
        let index = key.index();
        let slot = self.slots.get(index)?;
        if slot.generation != key.generation || slot.node.is_none() {
            return None;
        }
        Some(index)
    }

    fn node(&self, key: &ProcessKey) -> Option<&ProcessNode<P>> {
        let index = self.index_of(key)?;
        self.slots[index].node.as_ref()
    }

    fn node_mut(&mut self, key: &ProcessKey) -> Option<&mut ProcessNode<P>> {
        let index = self.index_of(key)?;
        self.slots[index].node.as_mut()
    }

    fn after_index(&self, index: usize) -> Option<usize> {
        let after = self.slots[index].node.as_ref()?.after?;
        self.index_of(&after)
    }

    fn order_key_at(&self, index: usize) -> u64 {
        self.slots[index]
            .node
            .as_ref()
            .map(|node| node.order_key)
            .unwrap_or(u64::MAX)
    }

    fn tag_at(&self, index: usize) -> u32 {
        self.slots[index]
            .node
            .as_ref()
            .map(|node| node.tag)
            .unwrap_or(0)
    }

    fn set_tag(&mut self, index: usize, tag: u32) {
        if let Some(node) = self.slots[index].node.as_mut() {
            node.tag = tag;
        }
    }

    // Generation 0 is the tag every new node starts with, so it is never used
    // for a pass. On wrap-around old tags are wiped instead.
    fn next_generation(&mut self) {
        self.current_tag = self.current_tag.wrapping_add(1);
        if self.current_tag == 0 {
            for slot in self.slots.iter_mut() {
                if let Some(node) = slot.node.as_mut() {
                    node.tag = 0;
                }
            }
            self.current_tag = 1;
        }
    }

    fn closes_cycle(&self, key: &ProcessKey) -> bool {
        let mut cursor = self.dependency(key);
        let mut steps = 0;
        while let Some(current) = cursor {
            if current == *key {
                return true;
            }
            steps += 1;
            if steps > self.len() {
                return false;
            }
            cursor = self.dependency(&current);
        }
        false
    }
}

fn not_found(key: &ProcessKey) -> ProcessError {
    ProcessError::ParticipantNotFound {
        key: format!("{:?}", key),
    }
}
