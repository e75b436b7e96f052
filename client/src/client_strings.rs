use log::trace;

use tether_shared::{BitReader, RemoteStringTable, Serde, SerdeErr, StringIndex, StringMapping, StringRef};

/// Receiving end of the server's string table for this connection.
#[derive(Default)]
pub struct ClientStrings {
    table: RemoteStringTable,
}

impl ClientStrings {
    pub fn new() -> Self {
        Self {
            table: RemoteStringTable::new(),
        }
    }

    /// Reads one mapping event and applies it. Returns the mapped index.
    pub fn read_mapping(&mut self, reader: &mut BitReader) -> Result<StringIndex, SerdeErr> {
        let mapping = StringMapping::de(reader)?;
        let index = mapping.index;
        self.table.apply(mapping);
        Ok(index)
    }

    /// Reads a string reference and resolves it. `Ok(None)` means the index
    /// has never been mapped on this connection.
    pub fn read_string_ref(&self, reader: &mut BitReader) -> Result<Option<&str>, SerdeErr> {
        let string_ref = StringRef::de(reader)?;
        let resolved = string_ref.resolve(&self.table);
        if resolved.is_none() {
            trace!("ClientStrings: unmapped string index {}", string_ref.0);
        }
        Ok(resolved)
    }

    pub fn lookup(&self, index: StringIndex) -> Option<&str> {
        self.table.lookup(index)
    }

    pub fn table(&self) -> &RemoteStringTable {
        &self.table
    }

    /// Forgets every mapping, as after a reconnect.
    pub fn clear(&mut self) {
        self.table.clear();
    }
}
