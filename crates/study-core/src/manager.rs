//! Prerequisite-gated study state machine.

use std::fmt;

use study_eval::SharedEvaluator;
use study_model::{Color, FontStyle, StateChangeEvent, StateIndex, TextOutput};
use study_state::{ObserverId, StateChangeNotifier, StateController};

use crate::definition::StudyDefinition;

/// Colours and font styles used for displayed text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyles {
    pub normal_color: Color,
    pub normal_style: FontStyle,
    pub error_color: Color,
    pub error_style: FontStyle,
}

impl Default for TextStyles {
    fn default() -> Self {
        Self {
            normal_color: Color::BLACK,
            normal_style: FontStyle::Normal,
            error_color: Color::RED,
            error_style: FontStyle::Bold,
        }
    }
}

/// Outcome of a gated transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The prerequisites of the candidate state failed; nothing changed.
    Rejected,
    /// The state was entered. `setup_ok` is false if its setup failed.
    Entered { setup_ok: bool },
}

impl Transition {
    pub fn is_entered(&self) -> bool {
        matches!(self, Self::Entered { .. })
    }
}

/// Runs a [`StudyDefinition`] as a state machine.
///
/// `next_state` is vetoed by the prerequisites of the candidate state.
/// `set_state` always commits and only skips the setup when the
/// prerequisites fail.
pub struct StudyStateManager {
    study: Box<dyn StudyDefinition>,
    evaluator: Option<SharedEvaluator>,
    output: Option<Box<dyn TextOutput>>,
    styles: TextStyles,
    display_objectives: bool,
    state: StateIndex,
    notifier: StateChangeNotifier,
}

impl StudyStateManager {
    pub fn new(study: impl StudyDefinition + 'static) -> Self {
        Self {
            study: Box::new(study),
            evaluator: None,
            output: None,
            styles: TextStyles::default(),
            display_objectives: true,
            state: 0,
            notifier: StateChangeNotifier::new(),
        }
    }

    #[must_use]
    pub fn with_evaluator(mut self, evaluator: SharedEvaluator) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: impl TextOutput + 'static) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    #[must_use]
    pub fn with_styles(mut self, styles: TextStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Shows the objective of every entered state on the text output.
    #[must_use]
    pub fn with_display_objectives(mut self, display: bool) -> Self {
        self.display_objectives = display;
        self
    }

    pub fn on_state_change(
        &mut self,
        observer: impl FnMut(&StateChangeEvent) + 'static,
    ) -> ObserverId {
        self.notifier.subscribe(observer)
    }

    pub fn notifier_mut(&mut self) -> &mut StateChangeNotifier {
        &mut self.notifier
    }

    pub fn study(&self) -> &dyn StudyDefinition {
        self.study.as_ref()
    }

    pub fn study_mut(&mut self) -> &mut dyn StudyDefinition {
        self.study.as_mut()
    }

    pub fn evaluator(&self) -> Option<&SharedEvaluator> {
        self.evaluator.as_ref()
    }

    pub fn displays_objectives(&self) -> bool {
        self.display_objectives
    }

    pub fn styles(&self) -> &TextStyles {
        &self.styles
    }

    // ---- Study hooks -----------------------------------------------------

    pub fn check_prerequisites(&self, state: StateIndex) -> bool {
        self.study.check_prerequisites(state)
    }

    pub fn setup_state(&mut self, state: StateIndex) -> bool {
        self.study.setup_state(state)
    }

    pub fn failure_message(&self, state: StateIndex) -> String {
        self.study.failure_message(state)
    }

    pub fn is_input_required(&self, state: StateIndex) -> bool {
        self.study.is_input_required(state)
    }

    /// Displays the objective of `state` in its colour, or the normal colour.
    pub fn show_objective(&mut self, state: StateIndex) {
        let objective = self.study.objective(state);
        let color = objective.color.unwrap_or(self.styles.normal_color);
        if let Some(output) = self.output.as_mut() {
            output.show(&objective.text, color, self.styles.normal_style);
        }
    }

    // ---- Transitions -----------------------------------------------------

    /// Enters `state`: re-checks prerequisites, shows the objective and runs
    /// the setup.
    ///
    /// Returns false if the prerequisites or the setup failed. Prerequisite
    /// failure skips the setup; a failed setup is not rolled back.
    pub fn load_state(&mut self, state: StateIndex) -> bool {
        if !self.check_prerequisites(state) {
            tracing::warn!(state, "prerequisites not met, setup skipped");
            return false;
        }
        if self.display_objectives {
            self.show_objective(state);
        }
        let ok = self.setup_state(state);
        if !ok {
            tracing::warn!(state, "state setup failed");
        }
        ok
    }

    /// Advances to `current + 1` if its prerequisites hold.
    ///
    /// On rejection the failure message is shown as an error and neither the
    /// state nor the observers are touched.
    pub fn advance(&mut self) -> Transition {
        let candidate = self.state.saturating_add(1);
        if !self.check_prerequisites(candidate) {
            let message = self.failure_message(candidate);
            tracing::error!(from = self.state, to = candidate, %message, "transition rejected");
            self.show_error(&message);
            return Transition::Rejected;
        }
        self.notifier.fire(self.state, candidate);
        self.state = candidate;
        Transition::Entered {
            setup_ok: self.load_state(candidate),
        }
    }

    /// Commits `state` without a veto. Returns the result of [`load_state`].
    ///
    /// [`load_state`]: Self::load_state
    pub fn enter(&mut self, state: StateIndex) -> bool {
        self.notifier.fire(self.state, state);
        self.state = state;
        self.load_state(state)
    }

    // ---- Evaluation ------------------------------------------------------

    pub fn start_evaluation(&mut self, state: StateIndex) {
        if let Some(evaluator) = &self.evaluator {
            evaluator.borrow_mut().start_state(state);
        }
    }

    pub fn end_evaluation(&mut self, state: StateIndex) {
        if let Some(evaluator) = &self.evaluator {
            evaluator.borrow_mut().end_state(state);
        }
    }

    // ---- Text output -----------------------------------------------------

    pub fn show_error(&mut self, message: &str) {
        let TextStyles {
            error_color,
            error_style,
            ..
        } = self.styles;
        if let Some(output) = self.output.as_mut() {
            output.show(message, error_color, error_style);
        }
    }

    pub fn show_text(&mut self, message: &str) {
        let TextStyles {
            normal_color,
            normal_style,
            ..
        } = self.styles;
        if let Some(output) = self.output.as_mut() {
            output.show(message, normal_color, normal_style);
        }
    }

    pub fn clear_text(&mut self) {
        if let Some(output) = self.output.as_mut() {
            output.clear();
        }
    }
}

impl StateController for StudyStateManager {
    fn current_state(&self) -> StateIndex {
        self.state
    }

    fn set_state(&mut self, state: StateIndex) {
        self.enter(state);
    }

    fn next_state(&mut self) {
        self.advance();
    }

    fn is_user_input_active(&self) -> bool {
        self.is_input_required(self.state)
    }
}

impl fmt::Debug for StudyStateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudyStateManager")
            .field("state", &self.state)
            .field("display_objectives", &self.display_objectives)
            .field("evaluator", &self.evaluator.is_some())
            .field("output", &self.output.is_some())
            .finish_non_exhaustive()
    }
}
