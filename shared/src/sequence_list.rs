use std::collections::VecDeque;

use thiserror::Error;

use crate::{tick_less_than, Tick};

/// Errors that can occur during SequenceList operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// Attempted to insert a duplicate tick into the sequence list
    #[error("Duplicate tick {tick} not allowed in SequenceList")]
    DuplicateTick { tick: Tick },
}

/// Items kept in ascending wrapping-tick order. Inserts scan from the back,
/// since new items almost always belong at the end.
pub struct SequenceList<T> {
    list: VecDeque<(Tick, T)>,
}

impl<T> Default for SequenceList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SequenceList<T> {
    pub fn new() -> Self {
        Self {
            list: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn pop_front(&mut self) -> Option<(Tick, T)> {
        self.list.pop_front()
    }

    pub fn insert_scan_from_back(&mut self, tick: Tick, item: T) -> Result<(), SequenceError> {
        let mut index = self.list.len();

        while index > 0 {
            let old_tick = self.list[index - 1].0;
            if old_tick == tick {
                return Err(SequenceError::DuplicateTick { tick });
            }
            if tick_less_than(old_tick, tick) {
                break;
            }
            index -= 1;
        }

        self.list.insert(index, (tick, item));
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Tick, T)> {
        self.list.iter()
    }
}
