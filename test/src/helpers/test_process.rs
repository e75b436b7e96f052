use tether_shared::{DirtyMask, DirtyTracker, Process, ProcessContext, ProcessKey};

use crate::test_world::{Journal, TestEntity};

/// What a `Recorder` does to the list on its next tick.
#[derive(Clone, Debug)]
pub enum TickAction {
    Nothing,
    RemoveSelf,
    Remove(ProcessKey),
    Spawn(&'static str),
}

/// Writes its name into the journal every tick, and keeps what it was told
/// about interpolation and animation.
pub struct Recorder {
    pub name: &'static str,
    pub action: TickAction,
    pub deltas: Vec<f32>,
    pub animated_seconds: f32,
}

impl Recorder {
    pub fn new(name: &'static str) -> Self {
        Self::with_action(name, TickAction::Nothing)
    }

    pub fn with_action(name: &'static str, action: TickAction) -> Self {
        Self {
            name,
            action,
            deltas: Vec::new(),
            animated_seconds: 0.0,
        }
    }
}

impl Process for Recorder {
    type Input = u32;
    type World = Journal;

    fn on_tick(&mut self, input: Option<u32>, context: &mut ProcessContext<'_, Self>) {
        let tick = context.tick();
        let journal = context.world();
        journal.ticks.push((tick, self.name));
        if let Some(input) = input {
            journal.inputs.push((self.name, input));
        }

        match std::mem::replace(&mut self.action, TickAction::Nothing) {
            TickAction::Nothing => {}
            TickAction::RemoveSelf => {
                let key = context.key();
                context.remove(&key).unwrap();
            }
            TickAction::Remove(key) => {
                context.remove(&key).unwrap();
            }
            TickAction::Spawn(name) => {
                context.add(Recorder::new(name));
            }
        }
    }

    fn on_interpolate(&mut self, delta: f32) {
        self.deltas.push(delta);
    }

    fn on_animate(&mut self, elapsed_seconds: f32) {
        self.animated_seconds += elapsed_seconds;
    }
}

/// Marks its entity dirty every tick: with the input's bits when it has one,
/// otherwise with `idle_bits`.
pub struct Mover {
    pub entity: TestEntity,
    pub idle_bits: u32,
}

impl Mover {
    pub fn new(entity: TestEntity, idle_bits: u32) -> Self {
        Self { entity, idle_bits }
    }
}

impl Process for Mover {
    type Input = u32;
    type World = DirtyTracker<TestEntity>;

    fn on_tick(&mut self, input: Option<u32>, context: &mut ProcessContext<'_, Self>) {
        let bits = input.unwrap_or(self.idle_bits);
        if bits == 0 {
            return;
        }
        let entity = self.entity;
        context
            .world()
            .mark_dirty(&entity, DirtyMask::from_bits(bits))
            .unwrap();
    }
}
