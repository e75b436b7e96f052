use std::collections::VecDeque;

use log::trace;

use tether_shared::{ConnectionKey, InputSource, Tick};

use crate::{client_process_list::LOCAL_CONTROLLER, link_status::LinkStatus};

/// Local inputs on their way to the simulation and to the server.
///
/// Every input is stamped with the client tick it was produced on. It is
/// consumed once by the local prediction and kept until the server
/// acknowledges it.
pub struct InputQueue<I: Clone> {
    next_tick: Tick,
    unconsumed: VecDeque<I>,
    unacked: VecDeque<(Tick, I)>,
    max_pending: usize,
}

impl<I: Clone> InputQueue<I> {
    pub fn new(max_pending: usize) -> Self {
        Self {
            next_tick: 0,
            unconsumed: VecDeque::new(),
            unacked: VecDeque::new(),
            max_pending: max_pending.max(1),
        }
    }

    /// Queues a local input and returns the tick it is stamped with.
    pub fn push(&mut self, input: I) -> Tick {
        let tick = self.next_tick;
        self.next_tick = self.next_tick.wrapping_add(1);
        self.unconsumed.push_back(input.clone());
        self.unacked.push_back((tick, input));
        tick
    }

    /// Inputs the server has not acknowledged yet, oldest first. The
    /// transport sends these.
    pub fn unacked(&self) -> impl Iterator<Item = &(Tick, I)> {
        self.unacked.iter()
    }

    pub fn unacked_count(&self) -> usize {
        self.unacked.len()
    }

    pub fn pending_count(&self) -> usize {
        self.unconsumed.len()
    }

    /// The server consumed the oldest `count` unacknowledged inputs.
    pub fn acknowledge(&mut self, count: usize) {
        let count = count.min(self.unacked.len());
        self.unacked.drain(..count);
        trace!(
            "InputQueue: {} inputs acknowledged, {} outstanding",
            count,
            self.unacked.len()
        );
    }
}

impl<I: Clone> InputSource<I> for InputQueue<I> {
    fn has_pending(&self, controller: &ConnectionKey) -> bool {
        *controller == LOCAL_CONTROLLER && !self.unconsumed.is_empty()
    }

    fn next_input(&mut self, controller: &ConnectionKey) -> Option<I> {
        if *controller != LOCAL_CONTROLLER {
            return None;
        }
        self.unconsumed.pop_front()
    }
}

impl<I: Clone> LinkStatus for InputQueue<I> {
    fn is_backlogged(&self) -> bool {
        self.unacked.len() >= self.max_pending
    }
}
