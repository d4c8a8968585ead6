use study_model::StateIndex;

use crate::StateController;

/// Operator-side driver for moving a controller by hand.
///
/// `state` is the operator's target for [`ManualTester::set_state`]; it is
/// kept in step by increment and reset.
#[derive(Debug, Clone, Default)]
pub struct ManualTester {
    pub state: StateIndex,
}

impl ManualTester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the controller into `self.state`.
    pub fn set_state(&self, controller: &mut dyn StateController) {
        controller.set_state(self.state);
    }

    /// Advances the controller and the target by one.
    pub fn increment_state(&mut self, controller: &mut dyn StateController) {
        self.state = self.state.saturating_add(1);
        controller.next_state();
    }

    /// Resets the controller and the target to 0.
    pub fn reset_state(&mut self, controller: &mut dyn StateController) {
        self.state = 0;
        controller.reset_state();
    }
}
