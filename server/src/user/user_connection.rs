use std::collections::HashMap;

use log::trace;

use tether_shared::{DirtyMask, PacketIndex, StringIndex, StringMapping, StringTable};

struct SentPacket<E> {
    updates: Vec<(E, DirtyMask)>,
    mappings: Vec<StringMapping>,
}

/// Per-connection send state: the connection's string table plus what each
/// in-flight packet carried, so delivery and loss can be settled later.
pub struct UserConnection<E> {
    strings: StringTable,
    sent_packets: HashMap<PacketIndex, SentPacket<E>>,
}

impl<E: Copy> UserConnection<E> {
    pub fn new() -> Self {
        Self {
            strings: StringTable::new(),
            sent_packets: HashMap::new(),
        }
    }

    pub fn strings(&self) -> &StringTable {
        &self.strings
    }

    pub fn intern_string(&mut self, value: &str) -> (StringIndex, bool) {
        self.strings.intern_or_lookup(value)
    }

    pub fn take_outgoing_mappings(&mut self) -> Vec<StringMapping> {
        self.strings.take_outgoing_mappings()
    }

    pub fn record_packet(
        &mut self,
        packet_index: PacketIndex,
        updates: Vec<(E, DirtyMask)>,
        mappings: Vec<StringMapping>,
    ) {
        if updates.is_empty() && mappings.is_empty() {
            return;
        }
        self.sent_packets
            .insert(packet_index, SentPacket { updates, mappings });
    }

    /// Confirms every string mapping the packet carried. The updates need no
    /// further work.
    pub fn notify_delivered(&mut self, packet_index: PacketIndex) {
        let Some(packet) = self.sent_packets.remove(&packet_index) else {
            return;
        };
        for mapping in &packet.mappings {
            self.strings.notify_delivered(mapping);
        }
    }

    /// Forgets the packet and returns the updates it carried so they can be
    /// put back on their bindings. Lost mappings whose slot still holds the
    /// same value go back on the outgoing queue for the next packet.
    pub fn notify_dropped(&mut self, packet_index: PacketIndex) -> Vec<(E, DirtyMask)> {
        let Some(packet) = self.sent_packets.remove(&packet_index) else {
            return Vec::new();
        };
        trace!(
            "UserConnection: packet {} dropped with {} updates and {} mappings",
            packet_index,
            packet.updates.len(),
            packet.mappings.len()
        );
        for mapping in &packet.mappings {
            self.strings.requeue_mapping(mapping);
        }
        packet.updates
    }

    pub fn in_flight(&self) -> usize {
        self.sent_packets.len()
    }
}

impl<E: Copy> Default for UserConnection<E> {
    fn default() -> Self {
        Self::new()
    }
}
