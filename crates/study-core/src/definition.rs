//! Study-specific hooks.

use study_model::{Color, StateIndex};

/// Message shown when a transition is rejected by its prerequisites.
pub const DEFAULT_FAILURE_MESSAGE: &str =
    "ERROR: Not all requirements fulfilled to perform next state";

/// Objective text for a state.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub text: String,
    /// Colour to show the text in; `None` uses the manager's normal colour.
    pub color: Option<Color>,
}

impl Objective {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Hooks a concrete study supplies to a
/// [`StudyStateManager`](crate::StudyStateManager).
///
/// Every hook has a permissive default, so an empty implementation accepts
/// every transition and requires no input.
pub trait StudyDefinition {
    /// Returns true if everything needed to enter `state` is in place.
    fn check_prerequisites(&self, _state: StateIndex) -> bool {
        true
    }

    /// Prepares the scene for `state`. Returns false if setup failed.
    fn setup_state(&mut self, _state: StateIndex) -> bool {
        true
    }

    fn objective(&self, _state: StateIndex) -> Objective {
        Objective::new("No Objectives")
    }

    /// Text shown when the prerequisites of `state` are not met.
    fn failure_message(&self, _state: StateIndex) -> String {
        DEFAULT_FAILURE_MESSAGE.to_string()
    }

    /// Returns true if `state` waits for a human action before advancing.
    fn is_input_required(&self, _state: StateIndex) -> bool {
        false
    }
}

/// A study with no custom behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStudy;

impl StudyDefinition for DefaultStudy {}
