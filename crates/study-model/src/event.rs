//! State indices and change notifications.

use std::fmt;

/// Index of one step of a session.
///
/// Indices form a flat, non-branching sequence starting at 0 with no fixed
/// upper bound.
pub type StateIndex = u32;

/// A single state transition, fired once per transition in program order.
///
/// `new_state` is not necessarily `old_state + 1`; explicit jumps are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateChangeEvent {
    pub old_state: StateIndex,
    pub new_state: StateIndex,
}

impl StateChangeEvent {
    pub fn new(old_state: StateIndex, new_state: StateIndex) -> Self {
        Self {
            old_state,
            new_state,
        }
    }

    /// True if this transition moves exactly one step forward.
    pub fn is_increment(&self) -> bool {
        self.old_state.checked_add(1) == Some(self.new_state)
    }
}

impl fmt::Display for StateChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.old_state, self.new_state)
    }
}
