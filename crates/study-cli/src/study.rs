//! Study definition and evaluation hooks driven by the session file.

use std::cell::RefCell;
use std::rc::Rc;

use study_core::{DEFAULT_FAILURE_MESSAGE, Objective, StudyDefinition, StudySettings, generic};
use study_eval::{EvaluationHooks, LogWriter};
use study_model::{ObjectId, SharedScene, StateIndex};

use crate::config::StateSpec;

/// Study whose states are listed in the session file.
///
/// States past the end of the list have no prerequisites, no setup and need
/// no input.
pub struct ConfiguredStudy {
    scene: SharedScene,
    states: Vec<StateSpec>,
    failure_message: Option<String>,
}

impl ConfiguredStudy {
    pub fn new(scene: SharedScene, states: Vec<StateSpec>, failure_message: Option<String>) -> Self {
        Self {
            scene,
            states,
            failure_message,
        }
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    fn entry(&self, state: StateIndex) -> Option<&StateSpec> {
        self.states.get(usize::try_from(state).ok()?)
    }

    fn is_active(&self, object: &ObjectId) -> bool {
        match self.scene.borrow().is_active(object) {
            Ok(active) => active,
            Err(error) => {
                tracing::warn!(%error, "prerequisite object missing");
                false
            }
        }
    }
}

impl StudyDefinition for ConfiguredStudy {
    fn check_prerequisites(&self, state: StateIndex) -> bool {
        let Some(entry) = self.entry(state) else {
            return generic::check_true();
        };
        entry.requires_active.iter().all(|object| self.is_active(object))
    }

    fn setup_state(&mut self, state: StateIndex) -> bool {
        let Some(entry) = self.entry(state) else {
            return generic::setup_none();
        };
        let mut scene = self.scene.borrow_mut();
        let mut ok = true;
        let changes = entry
            .enable
            .iter()
            .map(|object| (object, true))
            .chain(entry.disable.iter().map(|object| (object, false)));
        for (object, active) in changes {
            let result = if active {
                generic::enable(&mut *scene, object)
            } else {
                generic::disable(&mut *scene, object)
            };
            if let Err(error) = result {
                tracing::warn!(state, %error, "setup step failed");
                ok = false;
            }
        }
        ok
    }

    fn objective(&self, state: StateIndex) -> Objective {
        let entry = self.entry(state);
        let Some(text) = entry.and_then(|entry| entry.objective.clone()) else {
            return Objective::new("No Objectives");
        };
        let objective = Objective::new(text);
        match entry.and_then(|entry| entry.objective_color) {
            Some(color) => objective.with_color(color),
            None => objective,
        }
    }

    fn failure_message(&self, state: StateIndex) -> String {
        self.entry(state)
            .and_then(|entry| entry.failure_message.clone())
            .or_else(|| self.failure_message.clone())
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string())
    }

    fn is_input_required(&self, state: StateIndex) -> bool {
        self.entry(state).is_some_and(|entry| entry.input_required)
    }
}

/// Tracked object list shared between the session and its log hooks.
pub type TrackedObjects = Rc<RefCell<Vec<ObjectId>>>;

/// Writes the participant settings to the header and the tracked object
/// transforms at the end of every state.
pub struct SessionHooks {
    settings: StudySettings,
    scene: SharedScene,
    tracked: TrackedObjects,
}

impl SessionHooks {
    pub fn new(settings: StudySettings, scene: SharedScene, tracked: TrackedObjects) -> Self {
        Self {
            settings,
            scene,
            tracked,
        }
    }
}

impl EvaluationHooks for SessionHooks {
    fn write_header_lines(&mut self, log: &mut LogWriter) {
        log.write_line("dominantHand", self.settings.dominant_hand.label());
    }

    fn end_state_data(&mut self, _state: StateIndex, log: &mut LogWriter) {
        let tracked = self.tracked.borrow();
        if tracked.is_empty() {
            return;
        }
        let scene = self.scene.borrow();
        log.begin_named_object("objects");
        for object in tracked.iter() {
            match scene.transform(object) {
                Ok(transform) => log.write_line(object.as_str(), transform),
                Err(error) => tracing::warn!(%error, "tracked object missing from log"),
            }
        }
        log.end_object();
    }
}
