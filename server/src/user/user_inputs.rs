use std::collections::HashMap;

use log::{info, warn};

use tether_shared::{tick_greater_than, ConnectionKey, InputSource, SequenceList, Tick};

use crate::error::InputError;

struct InputBuffer<I> {
    inputs: SequenceList<I>,
    last_consumed: Option<Tick>,
}

impl<I> InputBuffer<I> {
    fn new() -> Self {
        Self {
            inputs: SequenceList::new(),
            last_consumed: None,
        }
    }
}

/// Inputs received from each connection, kept in the order of the client
/// tick they were produced on. Each simulated tick consumes at most one input
/// per connection.
pub struct UserInputs<I> {
    buffers: HashMap<ConnectionKey, InputBuffer<I>>,
    max_buffered: usize,
}

impl<I> UserInputs<I> {
    pub fn new(max_buffered: usize) -> Self {
        Self {
            buffers: HashMap::new(),
            max_buffered: max_buffered.max(1),
        }
    }

    pub fn add_user(&mut self, connection: ConnectionKey) {
        self.buffers.entry(connection).or_insert_with(InputBuffer::new);
        info!("UserInputs: buffering inputs for connection {}", connection.to_u64());
    }

    pub fn remove_user(&mut self, connection: &ConnectionKey) {
        self.buffers.remove(connection);
    }

    /// Buffers an input produced on client tick `tick`. Inputs for ticks that
    /// were already consumed, or for a tick that already has one, are
    /// rejected. A full buffer drops its oldest input.
    pub fn receive_input(
        &mut self,
        connection: &ConnectionKey,
        tick: Tick,
        input: I,
    ) -> Result<(), InputError> {
        let Some(buffer) = self.buffers.get_mut(connection) else {
            return Err(InputError::ConnectionNotFound {
                connection: connection.to_u64(),
            });
        };

        if let Some(last_consumed) = buffer.last_consumed {
            if !tick_greater_than(tick, last_consumed) {
                return Err(InputError::StaleInput {
                    tick,
                    last_consumed,
                });
            }
        }

        buffer.inputs.insert_scan_from_back(tick, input)?;

        if buffer.inputs.len() > self.max_buffered {
            if let Some((dropped, _)) = buffer.inputs.pop_front() {
                warn!(
                    "UserInputs: connection {} is {} inputs ahead, dropping input for tick {}",
                    connection.to_u64(),
                    self.max_buffered,
                    dropped
                );
            }
        }
        Ok(())
    }

    pub fn pending_count(&self, connection: &ConnectionKey) -> usize {
        self.buffers
            .get(connection)
            .map(|buffer| buffer.inputs.len())
            .unwrap_or(0)
    }

    pub fn last_consumed(&self, connection: &ConnectionKey) -> Option<Tick> {
        self.buffers.get(connection)?.last_consumed
    }
}

impl<I> InputSource<I> for UserInputs<I> {
    fn has_pending(&self, controller: &ConnectionKey) -> bool {
        self.pending_count(controller) > 0
    }

    fn next_input(&mut self, controller: &ConnectionKey) -> Option<I> {
        let buffer = self.buffers.get_mut(controller)?;
        let (tick, input) = buffer.inputs.pop_front()?;
        buffer.last_consumed = Some(tick);
        Some(input)
    }
}
