use super::process_context::ProcessContext;

/// A simulation participant that a `ProcessList` advances once per tick.
pub trait Process: Sized {
    /// Control input consumed by one tick, e.g. a player's move.
    type Input;
    /// Whatever the participants mutate while ticking, passed through to each
    /// callback by the caller of `advance`.
    type World;

    /// Advances one fixed tick. `input` is present only when the participant
    /// is controlled and its controller had a queued input.
    fn on_tick(&mut self, input: Option<Self::Input>, context: &mut ProcessContext<'_, Self>);

    /// Blends toward the last whole tick. `delta` is the fraction of a tick
    /// still to go before the next one, from 0 (exactly on a tick) to 1.
    fn on_interpolate(&mut self, _delta: f32) {}

    /// Advances purely cosmetic state by real elapsed time.
    fn on_animate(&mut self, _elapsed_seconds: f32) {}
}
