use std::{collections::HashSet, hash::Hash};

use super::binding::BindingState;

/// One connection's view of its bindings, split by whether anything is owed.
/// The transport only has to look at `active` when building a packet.
pub struct ConnectionBindings<E: Copy + Eq + Hash> {
    idle: HashSet<E>,
    active: HashSet<E>,
}

impl<E: Copy + Eq + Hash> ConnectionBindings<E> {
    pub fn new() -> Self {
        Self {
            idle: HashSet::new(),
            active: HashSet::new(),
        }
    }

    pub fn insert(&mut self, entity: E, state: BindingState) {
        match state {
            BindingState::Idle => self.idle.insert(entity),
            BindingState::Active => self.active.insert(entity),
        };
    }

    pub fn remove(&mut self, entity: &E) {
        if !self.idle.remove(entity) {
            self.active.remove(entity);
        }
    }

    pub fn activate(&mut self, entity: E) {
        self.idle.remove(&entity);
        self.active.insert(entity);
    }

    pub fn deactivate(&mut self, entity: E) {
        self.active.remove(&entity);
        self.idle.insert(entity);
    }

    pub fn state(&self, entity: &E) -> Option<BindingState> {
        if self.active.contains(entity) {
            Some(BindingState::Active)
        } else if self.idle.contains(entity) {
            Some(BindingState::Idle)
        } else {
            None
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &E> {
        self.active.iter()
    }

    pub fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.idle.len() + self.active.len()
    }

    /// Empties both sets, returning every entity that was bound.
    pub fn drain(&mut self) -> Vec<E> {
        let mut output: Vec<E> = self.idle.drain().collect();
        output.extend(self.active.drain());
        output
    }
}

impl<E: Copy + Eq + Hash> Default for ConnectionBindings<E> {
    fn default() -> Self {
        Self::new()
    }
}
