use std::{
    collections::{hash_map::DefaultHasher, VecDeque},
    hash::{Hash, Hasher},
};

use log::{debug, trace};

use crate::index_list::{IndexList, Link};

use super::string_mapping::{StringIndex, StringMapping};

pub const STRING_TABLE_SIZE: usize = 256;
const BUCKET_COUNT: usize = 256;

#[derive(Clone, Default)]
struct StringSlot {
    value: Option<String>,
    bucket_next: Option<StringIndex>,
    confirmed: bool,
}

/// Sender half of a connection's string table: a 256-entry LRU cache from
/// string values to slot indices.
///
/// A miss always evicts the least recently used slot, confirmed or not, and
/// queues a `StringMapping` for the transport. The receiver can briefly hold a
/// stale meaning for a reused index; that is harmless because the new mapping
/// is always written ahead of any reference to it on the same ordered channel.
pub struct StringTable {
    slots: Vec<StringSlot>,
    lru_links: Vec<Link>,
    lru: IndexList,
    buckets: Vec<Option<StringIndex>>,
    outgoing: VecDeque<StringMapping>,
}

impl Default for StringTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StringTable {
    pub fn new() -> Self {
        let mut table = Self {
            slots: vec![StringSlot::default(); STRING_TABLE_SIZE],
            lru_links: vec![Link::default(); STRING_TABLE_SIZE],
            lru: IndexList::new(),
            buckets: vec![None; BUCKET_COUNT],
            outgoing: VecDeque::new(),
        };
        // empty slots are handed out in index order
        for index in 0..STRING_TABLE_SIZE {
            table.lru.push_back(&mut table.lru_links, index);
        }
        table
    }

    /// Returns the slot holding `value` and whether the remote side has
    /// confirmed that mapping. On a miss the LRU slot is reused for `value`, a
    /// mapping event is queued, and `(index, false)` is returned.
    pub fn intern_or_lookup(&mut self, value: &str) -> (StringIndex, bool) {
        let bucket = bucket_of(value);

        if let Some(index) = self.find_in_bucket(bucket, value) {
            self.lru.move_to_back(&mut self.lru_links, usize::from(index));
            return (index, self.slots[usize::from(index)].confirmed);
        }

        // every slot stays in the LRU list, so the head is always present
        let victim = self.lru.head().unwrap_or(0);
        let index = victim as StringIndex;

        if let Some(old_value) = self.slots[victim].value.take() {
            trace!("StringTable: evicting {:?} from slot {}", old_value, index);
            self.unlink_from_bucket(bucket_of(&old_value), index);
        }

        let slot = &mut self.slots[victim];
        slot.value = Some(value.to_string());
        slot.confirmed = false;
        slot.bucket_next = self.buckets[bucket];
        self.buckets[bucket] = Some(index);

        self.lru.move_to_back(&mut self.lru_links, victim);

        debug!("StringTable: mapping slot {} -> {:?}", index, value);
        self.outgoing.push_back(StringMapping::new(index, value));

        (index, false)
    }

    /// Marks the mapping delivered, but only if `index` still holds `value`;
    /// a confirmation for an evicted mapping is dropped. Returns whether the
    /// confirmation was applied.
    pub fn confirm_received(&mut self, index: StringIndex, value: &str) -> bool {
        let slot = &mut self.slots[usize::from(index)];
        if slot.value.as_deref() != Some(value) {
            trace!("StringTable: dropping stale confirmation for slot {}", index);
            return false;
        }
        slot.confirmed = true;
        true
    }

    /// Delivery notification for a previously sent mapping event.
    pub fn notify_delivered(&mut self, mapping: &StringMapping) -> bool {
        self.confirm_received(mapping.index, &mapping.value)
    }

    /// Puts a lost mapping event back on the outgoing queue, provided `index`
    /// still holds the same unconfirmed value. A mapping for a slot that was
    /// reused since is not resent. Returns whether it was queued.
    pub fn requeue_mapping(&mut self, mapping: &StringMapping) -> bool {
        let slot = &self.slots[usize::from(mapping.index)];
        if slot.confirmed || slot.value.as_deref() != Some(mapping.value.as_str()) {
            trace!("StringTable: not resending stale mapping for slot {}", mapping.index);
            return false;
        }
        if !self.outgoing.contains(mapping) {
            self.outgoing.push_back(mapping.clone());
        }
        true
    }

    /// Mapping events queued since the last call, oldest first.
    pub fn take_outgoing_mappings(&mut self) -> Vec<StringMapping> {
        self.outgoing.drain(..).collect()
    }

    pub fn has_outgoing_mappings(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// Looks up a value without touching recency.
    pub fn index_of(&self, value: &str) -> Option<StringIndex> {
        self.find_in_bucket(bucket_of(value), value)
    }

    pub fn lookup(&self, index: StringIndex) -> Option<&str> {
        self.slots[usize::from(index)].value.as_deref()
    }

    pub fn is_confirmed(&self, index: StringIndex) -> bool {
        self.slots[usize::from(index)].confirmed
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every mapping, as after a reconnect.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn find_in_bucket(&self, bucket: usize, value: &str) -> Option<StringIndex> {
        let mut cursor = self.buckets[bucket];
        while let Some(index) = cursor {
            let slot = &self.slots[usize::from(index)];
            if slot.value.as_deref() == Some(value) {
                return Some(index);
            }
            cursor = slot.bucket_next;
        }
        None
    }

    fn unlink_from_bucket(&mut self, bucket: usize, index: StringIndex) {
        let next = self.slots[usize::from(index)].bucket_next.take();

        if self.buckets[bucket] == Some(index) {
            self.buckets[bucket] = next;
            return;
        }

        let mut cursor = self.buckets[bucket];
        while let Some(current) = cursor {
            let slot = &mut self.slots[usize::from(current)];
            if slot.bucket_next == Some(index) {
                slot.bucket_next = next;
                return;
            }
            cursor = slot.bucket_next;
        }
    }
}

fn bucket_of(value: &str) -> usize {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    (hasher.finish() as usize) % BUCKET_COUNT
}
