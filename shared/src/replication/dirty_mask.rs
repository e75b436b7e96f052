use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// A 32-bit word of "what changed" flags. Bit meaning belongs to the entity's
/// own type; the tracker only stores, ORs and clears bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirtyMask(u32);

impl DirtyMask {
    pub const EMPTY: DirtyMask = DirtyMask(0);
    pub const ALL: DirtyMask = DirtyMask(u32::MAX);
    pub const BIT_COUNT: u8 = 32;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn is_clear(&self) -> bool {
        self.0 == 0
    }

    pub fn bit(&self, index: u8) -> bool {
        index < Self::BIT_COUNT && self.0 & (1 << index) != 0
    }

    /// Indices past the 32nd bit are ignored.
    pub fn set_bit(&mut self, index: u8, value: bool) {
        debug_assert!(index < Self::BIT_COUNT, "dirty bit {} out of range", index);
        if index >= Self::BIT_COUNT {
            return;
        }
        if value {
            self.0 |= 1 << index;
        } else {
            self.0 &= !(1 << index);
        }
    }

    pub fn or(&mut self, other: &DirtyMask) {
        self.0 |= other.0;
    }

    /// Clears every bit that is set in `other`.
    pub fn clear_bits(&mut self, other: &DirtyMask) {
        self.0 &= !other.0;
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn intersects(&self, other: &DirtyMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn contains(&self, other: &DirtyMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for DirtyMask {
    type Output = DirtyMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        DirtyMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for DirtyMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for DirtyMask {
    type Output = DirtyMask;

    fn bitand(self, rhs: Self) -> Self::Output {
        DirtyMask(self.0 & rhs.0)
    }
}

impl Not for DirtyMask {
    type Output = DirtyMask;

    fn not(self) -> Self::Output {
        DirtyMask(!self.0)
    }
}

impl Serde for DirtyMask {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u32::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.0.bit_length()
    }
}
