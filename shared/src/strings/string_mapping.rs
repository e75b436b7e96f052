use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::remote_string_table::RemoteStringTable;

/// Index of a slot in a connection's string table.
pub type StringIndex = u8;

/// Out-of-band event telling the remote side that `index` now stands for
/// `value`. Must be written on the same ordered sub-channel as, and ahead of,
/// every `StringRef` to that index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringMapping {
    pub index: StringIndex,
    pub value: String,
}

impl StringMapping {
    pub fn new(index: StringIndex, value: impl Into<String>) -> Self {
        Self {
            index,
            value: value.into(),
        }
    }
}

impl Serde for StringMapping {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.index.ser(writer);
        self.value.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let index = StringIndex::de(reader)?;
        let value = String::de(reader)?;
        Ok(Self { index, value })
    }

    fn bit_length(&self) -> u32 {
        self.index.bit_length() + self.value.bit_length()
    }
}

/// A string field written as its table index instead of its characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StringRef(pub StringIndex);

impl StringRef {
    pub fn resolve<'a>(&self, table: &'a RemoteStringTable) -> Option<&'a str> {
        table.lookup(self.0)
    }
}

impl Serde for StringRef {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(StringIndex::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.0.bit_length()
    }
}
