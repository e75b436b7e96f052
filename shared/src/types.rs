pub type PacketIndex = u16;
pub type Tick = u16;

/// Identifies one remote connection (a user on the server, the server on a
/// client). Also used to name the controller of a participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionKey(u64);

impl ConnectionKey {
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}
