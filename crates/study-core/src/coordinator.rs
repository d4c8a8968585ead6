//! Session coordinator.
//!
//! Keeps a ghost manager and a study manager in lock-step, publishes every
//! state over the bridge and advances automatically when a remote step
//! succeeds in a state that needs no human input.

use std::fmt;
use std::path::PathBuf;

use study_eval::Result as EvalResult;
use study_ghost::GhostManager;
use study_model::{Color, FontStyle, StateChangeEvent, StateIndex, TextOutput};
use study_state::{ObserverId, StateChangeNotifier, StateController};

use crate::bridge::{StepResult, StudyBridge};
use crate::manager::StudyStateManager;

/// Topic names used on the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeTopics {
    /// Topic the current state is published on.
    pub step: String,
    /// Topic step results are received from.
    pub results: String,
}

impl Default for BridgeTopics {
    fn default() -> Self {
        Self {
            step: "/study/setstep".to_string(),
            results: "/study/results".to_string(),
        }
    }
}

pub struct SessionCoordinator {
    ghosts: GhostManager,
    study: StudyStateManager,
    bridge: Box<dyn StudyBridge>,
    topics: BridgeTopics,
    output: Option<Box<dyn TextOutput>>,
    normal_color: Color,
    error_color: Color,
    state: StateIndex,
    auto_progress: bool,
    started: bool,
    notifier: StateChangeNotifier,
}

impl SessionCoordinator {
    pub fn new(
        ghosts: GhostManager,
        study: StudyStateManager,
        bridge: impl StudyBridge + 'static,
    ) -> Self {
        Self {
            ghosts,
            study,
            bridge: Box::new(bridge),
            topics: BridgeTopics::default(),
            output: None,
            normal_color: Color::BLACK,
            error_color: Color::RED,
            state: 0,
            auto_progress: false,
            started: false,
            notifier: StateChangeNotifier::new(),
        }
    }

    #[must_use]
    pub fn with_topics(mut self, topics: BridgeTopics) -> Self {
        self.topics = topics;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: impl TextOutput + 'static) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    #[must_use]
    pub fn with_colors(mut self, normal: Color, error: Color) -> Self {
        self.normal_color = normal;
        self.error_color = error;
        self
    }

    pub fn on_state_change(
        &mut self,
        observer: impl FnMut(&StateChangeEvent) + 'static,
    ) -> ObserverId {
        self.notifier.subscribe(observer)
    }

    pub fn ghosts(&self) -> &GhostManager {
        &self.ghosts
    }

    pub fn ghosts_mut(&mut self) -> &mut GhostManager {
        &mut self.ghosts
    }

    pub fn study(&self) -> &StudyStateManager {
        &self.study
    }

    pub fn study_mut(&mut self) -> &mut StudyStateManager {
        &mut self.study
    }

    pub fn topics(&self) -> &BridgeTopics {
        &self.topics
    }

    /// Whether a successful step result advances the state.
    pub fn auto_progress(&self) -> bool {
        self.auto_progress
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    // ---- Lifecycle -------------------------------------------------------

    /// Connects the bridge, enters state 0 and opens its evaluation block.
    pub fn start(&mut self) {
        if self.started {
            tracing::warn!("session already started");
            return;
        }
        self.connect();
        self.set_state(0);
        self.study.start_evaluation(0);
        self.started = true;
        tracing::info!("session started");
    }

    /// Closes the evaluation block of the current state and finalizes the
    /// evaluator. Returns the result file path, if an evaluator is attached.
    pub fn finish(&mut self) -> EvalResult<Option<PathBuf>> {
        if self.started {
            self.study.end_evaluation(self.state);
            self.started = false;
        }
        let Some(evaluator) = self.study.evaluator().cloned() else {
            return Ok(None);
        };
        let path = evaluator.borrow_mut().finalize()?;
        tracing::info!(path = %path.display(), state = self.state, "session finished");
        Ok(Some(path))
    }

    fn connect(&mut self) {
        if let Err(error) = self.bridge.register_publisher(&self.topics.step) {
            tracing::warn!(topic = %self.topics.step, %error, "failed to register publisher");
        }
        if let Err(error) = self.bridge.subscribe(&self.topics.results) {
            tracing::warn!(topic = %self.topics.results, %error, "failed to subscribe");
        }
    }

    // ---- Transitions -----------------------------------------------------

    /// Advances to `current + 1` if its prerequisites hold. Returns false and
    /// shows the failure message otherwise.
    pub fn advance(&mut self) -> bool {
        let candidate = self.state.saturating_add(1);
        if !self.study.check_prerequisites(candidate) {
            let message = self.study.failure_message(candidate);
            self.log_error(&message);
            return false;
        }
        self.study.end_evaluation(self.state);
        self.set_state(candidate);
        self.study.start_evaluation(candidate);
        true
    }

    fn publish_state(&mut self) {
        if let Err(error) = self.bridge.publish_state(&self.topics.step, self.state) {
            tracing::warn!(state = self.state, %error, "failed to publish state");
        }
    }

    // ---- Remote step results ---------------------------------------------

    /// Handles one step result from the external system.
    pub fn handle_step_result(&mut self, result: &StepResult) {
        if result.has_error {
            self.log_error(&result.message);
            return;
        }
        self.log_text(&format!(
            "Successfully completed step {} with message: {}",
            result.step, result.message
        ));
        if self.auto_progress {
            self.log_text("Auto-Progressing to next state....");
            self.advance();
        }
    }

    /// Handles every step result received since the last call. Returns how
    /// many were handled.
    pub fn pump_messages(&mut self) -> usize {
        let results = self.bridge.poll_step_results();
        for result in &results {
            self.handle_step_result(result);
        }
        results.len()
    }

    // ---- Text output -----------------------------------------------------

    fn log_text(&mut self, message: &str) {
        tracing::info!("{message}");
        if let Some(output) = self.output.as_mut() {
            output.clear();
        }
    }

    fn log_error(&mut self, message: &str) {
        tracing::error!("{message}");
        let color = self.error_color;
        if let Some(output) = self.output.as_mut() {
            output.show(message, color, FontStyle::Bold);
        }
    }

    /// Shows `message` in the normal colour.
    pub fn show_text(&mut self, message: &str) {
        let color = self.normal_color;
        if let Some(output) = self.output.as_mut() {
            output.show(message, color, FontStyle::Normal);
        }
    }
}

impl StateController for SessionCoordinator {
    fn current_state(&self) -> StateIndex {
        self.state
    }

    /// Commits `state` on the coordinator, the study setup and the ghosts,
    /// then publishes it.
    ///
    /// The study manager's own index is left untouched.
    fn set_state(&mut self, state: StateIndex) {
        self.notifier.fire(self.state, state);
        self.state = state;

        if self.study.displays_objectives() {
            self.study.show_objective(state);
        }
        if !self.study.setup_state(state) {
            tracing::warn!(state, "state setup failed");
        }
        self.ghosts.set_state(state);
        self.auto_progress = !self.study.is_input_required(state);
        self.publish_state();
    }

    fn next_state(&mut self) {
        self.advance();
    }

    fn is_user_input_active(&self) -> bool {
        self.study.is_input_required(self.state)
    }
}

impl fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("state", &self.state)
            .field("auto_progress", &self.auto_progress)
            .field("started", &self.started)
            .field("topics", &self.topics)
            .field("ghosts", &self.ghosts)
            .field("study", &self.study)
            .finish_non_exhaustive()
    }
}
