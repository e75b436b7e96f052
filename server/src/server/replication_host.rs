use std::{collections::HashMap, fmt::Debug, hash::Hash, time::Duration};

use log::{info, warn};

use tether_shared::{
    AdvanceReport, ConnectionKey, DirtyMask, DirtyTracker, FlushReport, PacketIndex, Process,
    StringIndex, StringMapping, StringTable, Tick,
};

use crate::{
    error::{HostError, InputError},
    server::{server_config::ServerConfig, server_process_list::ServerProcessList},
    user::{user_connection::UserConnection, user_inputs::UserInputs},
};

/// What one `frame()` did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub advance: AdvanceReport,
    pub flush: FlushReport,
}

/// Everything one packet to a connection should carry. Mappings are written
/// ahead of the updates so string references in the updates always resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingPacket<E> {
    pub mappings: Vec<StringMapping>,
    pub updates: Vec<(E, DirtyMask)>,
}

impl<E> OutgoingPacket<E> {
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty() && self.updates.is_empty()
    }
}

/// Authority host: advances the simulation, which marks entities dirty on
/// the tracker, then fans the marks out to every connection and hands the
/// transport what each connection is owed.
pub struct ReplicationHost<E: Copy + Eq + Hash + Debug, P: Process<World = DirtyTracker<E>>> {
    tracker: DirtyTracker<E>,
    processes: ServerProcessList<P>,
    inputs: UserInputs<P::Input>,
    users: HashMap<ConnectionKey, UserConnection<E>>,
}

impl<E: Copy + Eq + Hash + Debug, P: Process<World = DirtyTracker<E>>> ReplicationHost<E, P> {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            tracker: DirtyTracker::new(),
            processes: ServerProcessList::new(&config.tick),
            inputs: UserInputs::new(config.max_buffered_inputs),
            users: HashMap::new(),
        }
    }

    // Users

    pub fn add_user(&mut self, connection: ConnectionKey) -> Result<(), HostError> {
        if self.users.contains_key(&connection) {
            return Err(HostError::UserAlreadyExists {
                connection: connection.to_u64(),
            });
        }
        self.tracker.add_connection(connection)?;
        self.inputs.add_user(connection);
        self.users.insert(connection, UserConnection::new());
        info!("ReplicationHost: user {} connected", connection.to_u64());
        Ok(())
    }

    /// Drops every binding, buffered input and in-flight packet of the user.
    /// Returns the entities it was bound to.
    pub fn remove_user(&mut self, connection: &ConnectionKey) -> Result<Vec<E>, HostError> {
        if self.users.remove(connection).is_none() {
            return Err(Self::user_not_found(connection));
        }
        self.inputs.remove_user(connection);
        let entities = self.tracker.remove_connection(connection)?;
        info!("ReplicationHost: user {} disconnected", connection.to_u64());
        Ok(entities)
    }

    pub fn has_user(&self, connection: &ConnectionKey) -> bool {
        self.users.contains_key(connection)
    }

    pub fn receive_input(&mut self, connection: &ConnectionKey, tick: Tick, input: P::Input) -> Result<(), InputError> {
        self.inputs.receive_input(connection, tick, input)
    }

    // Frame

    /// Runs the ticks owed for `elapsed`, then fans the marks they made out
    /// to every binding.
    pub fn frame(&mut self, elapsed: Duration) -> FrameReport {
        let advance = self
            .processes
            .advance(elapsed, &mut self.tracker, &mut self.inputs);
        let flush = self.tracker.flush();
        FrameReport { advance, flush }
    }

    // Strings

    pub fn intern_string(&mut self, connection: &ConnectionKey, value: &str) -> Result<(StringIndex, bool), HostError> {
        let user = self.user_mut(connection)?;
        Ok(user.intern_string(value))
    }

    // Transport

    /// Takes everything owed to `connection` and remembers it under
    /// `packet_index` until the transport reports the packet's fate.
    pub fn collect_packet(
        &mut self,
        connection: &ConnectionKey,
        packet_index: PacketIndex,
    ) -> Result<OutgoingPacket<E>, HostError> {
        let Some(user) = self.users.get_mut(connection) else {
            return Err(Self::user_not_found(connection));
        };
        let mappings = user.take_outgoing_mappings();

        let mut updates = Vec::new();
        for entity in self.tracker.active_entities(connection)? {
            let mask = self.tracker.take_update(&entity, connection)?;
            if !mask.is_clear() {
                updates.push((entity, mask));
            }
        }

        user.record_packet(packet_index, updates.clone(), mappings.clone());
        Ok(OutgoingPacket { mappings, updates })
    }

    pub fn notify_packet_delivered(&mut self, connection: &ConnectionKey, packet_index: PacketIndex) -> Result<(), HostError> {
        self.user_mut(connection)?.notify_delivered(packet_index);
        Ok(())
    }

    /// Puts the dropped packet's updates back on their bindings and its string
    /// mappings back on the outgoing queue. Updates for bindings that no
    /// longer exist are discarded.
    pub fn notify_packet_dropped(&mut self, connection: &ConnectionKey, packet_index: PacketIndex) -> Result<(), HostError> {
        let dropped = self.user_mut(connection)?.notify_dropped(packet_index);
        for (entity, mask) in dropped {
            if !self.tracker.is_bound(&entity, connection) {
                warn!(
                    "ReplicationHost: discarding dropped update for unbound entity {:?}",
                    entity
                );
                continue;
            }
            self.tracker.requeue_update(&entity, connection, mask)?;
        }
        Ok(())
    }

    // Entities

    /// Destroys the entity everywhere. Returns the connections that were
    /// bound to it, which should be told it is gone.
    pub fn destroy_entity(&mut self, entity: &E) -> Result<Vec<ConnectionKey>, HostError> {
        Ok(self.tracker.destroy_entity(entity)?)
    }

    // Accessors

    pub fn tracker(&self) -> &DirtyTracker<E> {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut DirtyTracker<E> {
        &mut self.tracker
    }

    pub fn processes(&self) -> &ServerProcessList<P> {
        &self.processes
    }

    pub fn processes_mut(&mut self) -> &mut ServerProcessList<P> {
        &mut self.processes
    }

    pub fn inputs(&self) -> &UserInputs<P::Input> {
        &self.inputs
    }

    pub fn string_table(&self, connection: &ConnectionKey) -> Option<&StringTable> {
        self.users.get(connection).map(|user| user.strings())
    }

    /// Packets sent to `connection` whose fate is still unknown.
    pub fn in_flight_packets(&self, connection: &ConnectionKey) -> usize {
        self.users
            .get(connection)
            .map(|user| user.in_flight())
            .unwrap_or(0)
    }

    // Private

    fn user_mut(&mut self, connection: &ConnectionKey) -> Result<&mut UserConnection<E>, HostError> {
        self.users
            .get_mut(connection)
            .ok_or_else(|| Self::user_not_found(connection))
    }

    fn user_not_found(connection: &ConnectionKey) -> HostError {
        HostError::UserNotFound {
            connection: connection.to_u64(),
        }
    }
}
