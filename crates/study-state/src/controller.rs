use study_model::StateIndex;

/// Drives a component forward through a flat sequence of states.
///
/// Implementors own their current index. Bounds policy is left to each
/// implementation: this contract never rejects an index.
///
/// # Example
///
/// ```
/// use study_state::{StateController, StateIndex};
///
/// #[derive(Default)]
/// struct Counter(StateIndex);
///
/// impl StateController for Counter {
///     fn current_state(&self) -> StateIndex {
///         self.0
///     }
///
///     fn set_state(&mut self, state: StateIndex) {
///         self.0 = state;
///     }
/// }
///
/// let mut counter = Counter::default();
/// counter.next_state();
/// counter.next_state();
/// assert_eq!(counter.current_state(), 2);
/// counter.reset_state();
/// assert_eq!(counter.current_state(), 0);
/// ```
pub trait StateController {
    /// Returns the current state index.
    fn current_state(&self) -> StateIndex;

    /// Sets the current state unconditionally, notifies observers and loads
    /// the state.
    fn set_state(&mut self, state: StateIndex);

    /// Moves to the next state. Defaults to `set_state(current + 1)`.
    fn next_state(&mut self) {
        let next = self.current_state().saturating_add(1);
        self.set_state(next);
    }

    /// Returns to the first state. Defaults to `set_state(0)`.
    fn reset_state(&mut self) {
        self.set_state(0);
    }

    /// Returns true if the current state waits for a human action before
    /// advancing.
    fn is_user_input_active(&self) -> bool {
        true
    }
}
