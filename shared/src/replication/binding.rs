use super::dirty_mask::DirtyMask;

/// Which of its connection's two sets a Binding currently sits in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingState {
    /// Nothing owed to the connection.
    Idle,
    /// Some bits are waiting to be written by the transport.
    Active,
}

/// What one entity still owes one connection.
#[derive(Clone, Debug)]
pub struct Binding {
    mask: DirtyMask,
    state: BindingState,
}

impl Binding {
    pub fn new(initial: DirtyMask) -> Self {
        let state = if initial.is_clear() {
            BindingState::Idle
        } else {
            BindingState::Active
        };
        Self {
            mask: initial,
            state,
        }
    }

    pub fn mask(&self) -> DirtyMask {
        self.mask
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == BindingState::Active
    }

    /// ORs `bits` in, returning true if this moved the binding from idle to
    /// active.
    pub fn or_mask(&mut self, bits: &DirtyMask) -> bool {
        self.mask.or(bits);
        self.sync_state()
    }

    /// Drops the bits if they are exactly what the binding still owes,
    /// returning true if this demoted the binding to idle.
    pub fn strip_if_exact(&mut self, bits: &DirtyMask) -> bool {
        if self.mask.is_clear() || self.mask != *bits {
            return false;
        }
        self.mask.clear();
        self.state = BindingState::Idle;
        true
    }

    /// Hands the owed bits to the transport and goes idle.
    pub fn take(&mut self) -> DirtyMask {
        let mask = self.mask;
        self.mask.clear();
        self.state = BindingState::Idle;
        mask
    }

    fn sync_state(&mut self) -> bool {
        if self.state == BindingState::Idle && !self.mask.is_clear() {
            self.state = BindingState::Active;
            return true;
        }
        false
    }
}
