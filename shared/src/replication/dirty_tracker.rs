use std::{
    collections::{hash_map::Entry, HashMap},
    fmt::Debug,
    hash::Hash,
};

use log::{debug, info, trace};

use crate::{
    index_list::{IndexList, Link},
    ConnectionKey,
};

use super::{
    binding::{Binding, BindingState},
    connection_bindings::ConnectionBindings,
    dirty_mask::DirtyMask,
    error::ReplicationError,
};

struct EntityRecord<E> {
    entity: E,
    pending: DirtyMask,
    bindings: HashMap<ConnectionKey, Binding>,
}

/// What a single `flush()` did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Entities taken off the dirty list.
    pub entities: usize,
    /// Bindings that went from idle to active.
    pub activated: usize,
}

/// Collects "what changed" bits per entity and fans them out to every bound
/// connection once per tick.
///
/// Marking is O(1) no matter how many connections observe the entity: bits
/// pile up in the entity's pending mask, and the entity is linked into the
/// dirty list the first time its pending mask goes nonzero. `flush` then walks
/// only the dirty entities and ORs each pending mask into that entity's
/// bindings.
pub struct DirtyTracker<E: Copy + Eq + Hash + Debug> {
    slots: HashMap<E, usize>,
    records: Vec<Option<EntityRecord<E>>>,
    dirty_links: Vec<Link>,
    free_slots: Vec<usize>,
    dirty_list: IndexList,
    connections: HashMap<ConnectionKey, ConnectionBindings<E>>,
}

impl<E: Copy + Eq + Hash + Debug> Default for DirtyTracker<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Copy + Eq + Hash + Debug> DirtyTracker<E> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            records: Vec::new(),
            dirty_links: Vec::new(),
            free_slots: Vec::new(),
            dirty_list: IndexList::new(),
            connections: HashMap::new(),
        }
    }

    // Entities

    pub fn register_entity(&mut self, entity: E) -> Result<(), ReplicationError> {
        if self.slots.contains_key(&entity) {
            return Err(ReplicationError::EntityAlreadyRegistered {
                entity_id: format!("{:?}", entity),
            });
        }

        let record = EntityRecord {
            entity,
            pending: DirtyMask::EMPTY,
            bindings: HashMap::new(),
        };
        let slot = match self.free_slots.pop() {
            Some(slot) => {
                self.records[slot] = Some(record);
                slot
            }
            None => {
                self.records.push(Some(record));
                self.dirty_links.push(Link::default());
                self.records.len() - 1
            }
        };
        self.slots.insert(entity, slot);

        trace!("DirtyTracker: registered entity {:?} in slot {}", entity, slot);
        Ok(())
    }

    pub fn has_entity(&self, entity: &E) -> bool {
        self.slots.contains_key(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.slots.len()
    }

    /// Removes the entity, returning every connection it was bound to. The
    /// caller must tell each of those connections to detach the entity.
    pub fn destroy_entity(&mut self, entity: &E) -> Result<Vec<ConnectionKey>, ReplicationError> {
        let slot = self.slot(entity)?;

        // unlink before dropping the record so the dirty list never points at a free slot
        self.dirty_list.remove(&mut self.dirty_links, slot);

        let Some(record) = self.records[slot].take() else {
            return Err(Self::not_registered(entity));
        };
        self.slots.remove(entity);
        self.free_slots.push(slot);

        let mut detached = Vec::with_capacity(record.bindings.len());
        for connection in record.bindings.keys() {
            if let Some(bindings) = self.connections.get_mut(connection) {
                bindings.remove(entity);
            }
            detached.push(*connection);
        }

        debug!(
            "DirtyTracker: destroyed entity {:?}, detaching from {} connection(s)",
            entity,
            detached.len()
        );
        Ok(detached)
    }

    // Connections

    pub fn add_connection(&mut self, connection: ConnectionKey) -> Result<(), ReplicationError> {
        match self.connections.entry(connection) {
            Entry::Occupied(_) => Err(ReplicationError::ConnectionAlreadyAdded {
                connection: connection.to_u64(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(ConnectionBindings::new());
                info!("DirtyTracker: added connection {}", connection.to_u64());
                Ok(())
            }
        }
    }

    pub fn has_connection(&self, connection: &ConnectionKey) -> bool {
        self.connections.contains_key(connection)
    }

    /// How many entities are bound to the connection, owing something or not.
    pub fn bound_count(&self, connection: &ConnectionKey) -> usize {
        self.connections
            .get(connection)
            .map(|bindings| bindings.len())
            .unwrap_or(0)
    }

    /// Removes the connection and every Binding it held, returning the entities
    /// that were bound to it.
    pub fn remove_connection(&mut self, connection: &ConnectionKey) -> Result<Vec<E>, ReplicationError> {
        let Some(mut bindings) = self.connections.remove(connection) else {
            return Err(Self::connection_not_found(connection));
        };

        let entities = bindings.drain();
        for entity in &entities {
            if let Some(slot) = self.slots.get(entity) {
                if let Some(record) = self.records[*slot].as_mut() {
                    record.bindings.remove(connection);
                }
            }
        }

        info!(
            "DirtyTracker: removed connection {} with {} binding(s)",
            connection.to_u64(),
            entities.len()
        );
        Ok(entities)
    }

    // Bindings

    /// Creates the Binding for an entity entering a connection's scope.
    /// `initial` is what the connection is owed straight away, usually the full
    /// state for a first update or `DirtyMask::EMPTY`.
    pub fn bind(
        &mut self,
        entity: &E,
        connection: ConnectionKey,
        initial: DirtyMask,
    ) -> Result<(), ReplicationError> {
        let slot = self.slot(entity)?;
        let Some(bindings) = self.connections.get_mut(&connection) else {
            return Err(Self::connection_not_found(&connection));
        };
        let Some(record) = self.records[slot].as_mut() else {
            return Err(Self::not_registered(entity));
        };

        match record.bindings.entry(connection) {
            Entry::Occupied(_) => Err(ReplicationError::AlreadyBound {
                entity_id: format!("{:?}", entity),
                connection: connection.to_u64(),
            }),
            Entry::Vacant(entry) => {
                let binding = Binding::new(initial);
                bindings.insert(*entity, binding.state());
                entry.insert(binding);
                debug!(
                    "DirtyTracker: bound entity {:?} to connection {}",
                    entity,
                    connection.to_u64()
                );
                Ok(())
            }
        }
    }

    /// Destroys the Binding for an entity leaving a connection's scope,
    /// returning whatever was still owed.
    pub fn unbind(&mut self, entity: &E, connection: &ConnectionKey) -> Result<DirtyMask, ReplicationError> {
        let record = self.record_mut(entity)?;
        let Some(binding) = record.bindings.remove(connection) else {
            return Err(Self::not_bound(entity, connection));
        };
        if let Some(bindings) = self.connections.get_mut(connection) {
            bindings.remove(entity);
        }
        Ok(binding.mask())
    }

    pub fn is_bound(&self, entity: &E, connection: &ConnectionKey) -> bool {
        self.record(entity)
            .map(|record| record.bindings.contains_key(connection))
            .unwrap_or(false)
    }

    pub fn binding_mask(&self, entity: &E, connection: &ConnectionKey) -> Option<DirtyMask> {
        self.record(entity)
            .ok()?
            .bindings
            .get(connection)
            .map(|binding| binding.mask())
    }

    pub fn binding_state(&self, entity: &E, connection: &ConnectionKey) -> Option<BindingState> {
        self.connections.get(connection)?.state(entity)
    }

    // Marking

    /// ORs `mask` into the entity's pending mask. The first nonzero mark since
    /// the last flush links the entity into the dirty list.
    pub fn mark_dirty(&mut self, entity: &E, mask: DirtyMask) -> Result<(), ReplicationError> {
        let slot = self.slot(entity)?;
        let Some(record) = self.records[slot].as_mut() else {
            return Err(Self::not_registered(entity));
        };

        let was_clear = record.pending.is_clear();
        record.pending.or(&mask);
        if was_clear && !record.pending.is_clear() {
            self.dirty_list.push_front(&mut self.dirty_links, slot);
        }
        Ok(())
    }

    /// Withdraws bits that no longer need sending. Pending bits are cleared;
    /// any binding that owes exactly these bits and nothing else goes back to
    /// idle.
    pub fn clear_aspect(&mut self, entity: &E, mask: DirtyMask) -> Result<(), ReplicationError> {
        let slot = self.slot(entity)?;
        let Some(record) = self.records[slot].as_mut() else {
            return Err(Self::not_registered(entity));
        };

        if !record.pending.is_clear() {
            record.pending.clear_bits(&mask);
            if record.pending.is_clear() {
                self.dirty_list.remove(&mut self.dirty_links, slot);
            }
        }

        for (connection, binding) in record.bindings.iter_mut() {
            if binding.strip_if_exact(&mask) {
                if let Some(bindings) = self.connections.get_mut(connection) {
                    bindings.deactivate(record.entity);
                }
            }
        }
        Ok(())
    }

    pub fn pending_mask(&self, entity: &E) -> Option<DirtyMask> {
        self.record(entity).ok().map(|record| record.pending)
    }

    pub fn is_dirty(&self, entity: &E) -> bool {
        self.slots
            .get(entity)
            .map(|slot| self.dirty_links[*slot].is_linked())
            .unwrap_or(false)
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty_list.len()
    }

    // Fan-out

    /// Moves every pending mask into the bindings of its entity. Each dirty
    /// entity is visited once and the dirty list is left empty.
    pub fn flush(&mut self) -> FlushReport {
        let mut report = FlushReport::default();

        while let Some(slot) = self.dirty_list.pop_front(&mut self.dirty_links) {
            let Some(record) = self.records[slot].as_mut() else {
                continue;
            };
            report.entities += 1;

            let pending = record.pending;
            record.pending.clear();

            for (connection, binding) in record.bindings.iter_mut() {
                if binding.or_mask(&pending) {
                    report.activated += 1;
                    if let Some(bindings) = self.connections.get_mut(connection) {
                        bindings.activate(record.entity);
                    }
                }
            }
        }

        if report.entities > 0 {
            trace!(
                "DirtyTracker: flushed {} entities, activated {} bindings",
                report.entities,
                report.activated
            );
        }
        report
    }

    // Transport side

    /// Entities that owe this connection something, in no particular order.
    pub fn active_entities(&self, connection: &ConnectionKey) -> Result<Vec<E>, ReplicationError> {
        let Some(bindings) = self.connections.get(connection) else {
            return Err(Self::connection_not_found(connection));
        };
        Ok(bindings.active().copied().collect())
    }

    pub fn has_active(&self, connection: &ConnectionKey) -> bool {
        self.connections
            .get(connection)
            .map(|bindings| bindings.has_active())
            .unwrap_or(false)
    }

    /// Hands the transport what the binding owes and demotes it to idle.
    pub fn take_update(&mut self, entity: &E, connection: &ConnectionKey) -> Result<DirtyMask, ReplicationError> {
        let record = self.record_mut(entity)?;
        let Some(binding) = record.bindings.get_mut(connection) else {
            return Err(Self::not_bound(entity, connection));
        };
        let was_active = binding.is_active();
        let mask = binding.take();
        if was_active {
            if let Some(bindings) = self.connections.get_mut(connection) {
                bindings.deactivate(*entity);
            }
        }
        Ok(mask)
    }

    /// Puts the bits of an update the transport reports as dropped back onto
    /// the binding, re-activating it.
    pub fn requeue_update(
        &mut self,
        entity: &E,
        connection: &ConnectionKey,
        mask: DirtyMask,
    ) -> Result<(), ReplicationError> {
        let record = self.record_mut(entity)?;
        let Some(binding) = record.bindings.get_mut(connection) else {
            return Err(Self::not_bound(entity, connection));
        };
        if binding.or_mask(&mask) {
            if let Some(bindings) = self.connections.get_mut(connection) {
                bindings.activate(*entity);
            }
        }
        Ok(())
    }

    // Private

    fn slot(&self, entity: &E) -> Result<usize, ReplicationError> {
        self.slots
            .get(entity)
            .copied()
            .ok_or_else(|| Self::not_registered(entity))
    }

    fn record(&self, entity: &E) -> Result<&EntityRecord<E>, ReplicationError> {
        let slot = self.slot(entity)?;
        self.records[slot]
            .as_ref()
            .ok_or_else(|| Self::not_registered(entity))
    }

    fn record_mut(&mut self, entity: &E) -> Result<&mut EntityRecord<E>, ReplicationError> {
        let slot = self.slot(entity)?;
        self.records[slot]
            .as_mut()
            .ok_or_else(|| Self::not_registered(entity))
    }

    fn not_registered(entity: &E) -> ReplicationError {
        ReplicationError::EntityNotRegistered {
            entity_id: format!("{:?}", entity),
        }
    }

    fn connection_not_found(connection: &ConnectionKey) -> ReplicationError {
        ReplicationError::ConnectionNotFound {
            connection: connection.to_u64(),
        }
    }

    fn not_bound(entity: &E, connection: &ConnectionKey) -> ReplicationError {
        ReplicationError::NotBound {
            entity_id: format!("{:?}", entity),
            connection: connection.to_u64(),
        }
    }
}
