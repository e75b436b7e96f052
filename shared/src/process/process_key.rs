/// Handle to a participant in a `ProcessList`. Keys of removed participants
/// never match a later participant that reuses the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessKey {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ProcessKey {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        Self {
            index: index as u32,
            generation,
        }
    }

    pub(crate) fn index(&self) -> usize {
        self.index as usize
    }
}
