use crate::ConnectionKey;

/// Supplies the queued inputs of whoever controls a participant.
pub trait InputSource<I> {
    fn has_pending(&self, controller: &ConnectionKey) -> bool;

    /// Pops the next input for `controller`, if there is one.
    fn next_input(&mut self, controller: &ConnectionKey) -> Option<I>;
}

/// A source with no inputs, for lists whose participants are never controlled.
pub struct NoInputs;

impl<I> InputSource<I> for NoInputs {
    fn has_pending(&self, _controller: &ConnectionKey) -> bool {
        false
    }

    fn next_input(&mut self, _controller: &ConnectionKey) -> Option<I> {
        None
    }
}
