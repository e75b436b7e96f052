use log::trace;

use super::{
    string_mapping::{StringIndex, StringMapping},
    string_table::STRING_TABLE_SIZE,
};

/// Receiver half of a connection's string table. The sender alone decides
/// eviction, so this is a plain array indexed by the sender's slot index.
pub struct RemoteStringTable {
    slots: Vec<Option<String>>,
}

impl Default for RemoteStringTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStringTable {
    pub fn new() -> Self {
        Self {
            slots: vec![None; STRING_TABLE_SIZE],
        }
    }

    /// Records that `index` now stands for `value`, replacing whatever it
    /// meant before.
    pub fn remote_map_string(&mut self, index: StringIndex, value: String) {
        trace!("RemoteStringTable: slot {} -> {:?}", index, value);
        self.slots[usize::from(index)] = Some(value);
    }

    pub fn apply(&mut self, mapping: StringMapping) {
        self.remote_map_string(mapping.index, mapping.value);
    }

    pub fn lookup(&self, index: StringIndex) -> Option<&str> {
        self.slots[usize::from(index)].as_deref()
    }

    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
    }
}
