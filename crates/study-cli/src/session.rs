//! Scripted study session.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use tracing::info_span;

use study_core::{
    NoopBridge, RemoteEndpoint, SessionCoordinator, StepResult, StudyStateManager, TextStyles,
    channel_bridge,
};
use study_eval::{SharedEvaluator, StudyEvaluator};
use study_ghost::GhostManager;
use study_model::{InMemoryScene, Scene, SharedScene, StateIndex, TextPanel};
use study_state::{IncrementStateEffect, StateController};

use crate::config::SessionConfig;
use crate::script::{ScriptCommand, ScriptLine};
use crate::study::{ConfiguredStudy, SessionHooks, TrackedObjects};
use crate::types::{RunReport, StateSummary};

/// A running session assembled from a [`SessionConfig`].
pub struct Session {
    coordinator: SessionCoordinator,
    scene: Rc<RefCell<InMemoryScene>>,
    evaluator: SharedEvaluator,
    remote: Option<RemoteEndpoint>,
    button: IncrementStateEffect,
    panel: TextPanel,
    visits: Rc<RefCell<Vec<StateIndex>>>,
    tracked: TrackedObjects,
    published: Vec<StateIndex>,
    study_name: String,
    configured_states: usize,
    commands: usize,
    pushes_accepted: usize,
    pushes_ignored: usize,
    result_path: Option<PathBuf>,
}

impl Session {
    /// Builds every component and starts the session in state 0.
    pub fn start(config: &SessionConfig) -> Result<Self> {
        let scene = config.build_scene()?.into_shared();
        let shared: SharedScene = scene.clone();

        let mut ghosts = GhostManager::new(Rc::clone(&shared));
        for object in &config.scene.track {
            if !scene.borrow().contains(object) {
                bail!("tracked object {object} is not in the scene");
            }
            ghosts.track(object.clone());
        }
        for tag in &config.scene.track_tags {
            ghosts.add_to_tracking_by_tag(tag);
        }

        let tracked: TrackedObjects = Rc::new(RefCell::new(ghosts.tracked().to_vec()));
        let evaluator = StudyEvaluator::new(config.evaluator_config())
            .context("open evaluator")?
            .with_hooks(SessionHooks::new(
                config.settings.clone(),
                Rc::clone(&shared),
                Rc::clone(&tracked),
            ))
            .into_shared();

        let panel = TextPanel::new();
        let styles = TextStyles::default();
        let study = StudyStateManager::new(ConfiguredStudy::new(
            Rc::clone(&shared),
            config.study.states.clone(),
            config.study.failure_message.clone(),
        ))
        .with_evaluator(Rc::clone(&evaluator))
        .with_output(panel.clone())
        .with_styles(styles)
        .with_display_objectives(config.study.display_objectives);

        let (coordinator, remote) = if config.bridge.enabled {
            let (bridge, remote) = channel_bridge();
            (SessionCoordinator::new(ghosts, study, bridge), Some(remote))
        } else {
            (SessionCoordinator::new(ghosts, study, NoopBridge), None)
        };
        let mut coordinator = coordinator
            .with_topics(config.topics())
            .with_output(panel.clone())
            .with_colors(styles.normal_color, styles.error_color);

        let visits = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&visits);
        coordinator.on_state_change(move |event| recorder.borrow_mut().push(event.new_state));

        let button = IncrementStateEffect::new(config.button.lock_duration()?);

        let mut session = Self {
            coordinator,
            scene,
            evaluator,
            remote,
            button,
            panel,
            visits,
            tracked,
            published: Vec::new(),
            study_name: config.study.name.clone(),
            configured_states: config.study.states.len(),
            commands: 0,
            pushes_accepted: 0,
            pushes_ignored: 0,
            result_path: None,
        };
        session.coordinator.start();
        session.drain_published();
        tracing::info!(
            study = %session.study_name,
            identifier = %session.evaluator.borrow().identifier(),
            tracked = session.coordinator.ghosts().tracked().len(),
            "session ready"
        );
        Ok(session)
    }

    pub fn coordinator(&self) -> &SessionCoordinator {
        &self.coordinator
    }

    pub fn scene(&self) -> &Rc<RefCell<InMemoryScene>> {
        &self.scene
    }

    pub fn panel(&self) -> &TextPanel {
        &self.panel
    }

    pub fn is_finished(&self) -> bool {
        self.result_path.is_some()
    }

    /// Runs every line, then finishes the session if the script did not.
    pub fn run_script(mut self, script: &[ScriptLine]) -> Result<RunReport> {
        let span = info_span!("session", study = %self.study_name);
        let _guard = span.enter();
        for line in script {
            self.execute(&line.command)
                .with_context(|| format!("script line {}", line.line))?;
        }
        if !self.is_finished() {
            self.finish()?;
        }
        Ok(self.report())
    }

    pub fn execute(&mut self, command: &ScriptCommand) -> Result<()> {
        if self.is_finished() {
            bail!("session already finished");
        }
        self.commands += 1;
        tracing::debug!(?command, "execute");

        match command {
            ScriptCommand::Capture => {
                self.coordinator.ghosts_mut().create_state(None)?;
            }
            ScriptCommand::Replace(index) => {
                self.coordinator.ghosts_mut().create_state(Some(*index))?;
            }
            ScriptCommand::Remove(index) => {
                if self.coordinator.ghosts_mut().remove_state(*index).is_none() {
                    tracing::warn!(index, "no ghost state to remove");
                }
            }
            ScriptCommand::UpdateMissing => self.coordinator.ghosts_mut().update_missing_states()?,
            ScriptCommand::Track(tag) => {
                self.coordinator.ghosts_mut().add_to_tracking_by_tag(tag);
                *self.tracked.borrow_mut() = self.coordinator.ghosts().tracked().to_vec();
            }
            ScriptCommand::Set(state) => self.coordinator.set_state(*state),
            ScriptCommand::Next => self.coordinator.next_state(),
            ScriptCommand::Reset => self.coordinator.reset_state(),
            ScriptCommand::Press => {
                let accepted = self.button.on_button_down(&mut self.coordinator);
                self.button.on_button_up();
                if accepted {
                    self.pushes_accepted += 1;
                } else {
                    self.pushes_ignored += 1;
                }
            }
            ScriptCommand::Result {
                step,
                has_error,
                message,
            } => {
                let result = StepResult {
                    step: *step,
                    has_error: *has_error,
                    message: message.clone(),
                };
                self.deliver(&result)?;
            }
            ScriptCommand::Move { object, position } => {
                let mut scene = self.scene.borrow_mut();
                let mut transform = scene.transform(object)?;
                transform.position = *position;
                scene.set_transform(object, transform)?;
            }
            ScriptCommand::Finish => self.finish()?,
        }
        self.drain_published();
        Ok(())
    }

    /// Routes a step result through the remote endpoint when connected.
    fn deliver(&mut self, result: &StepResult) -> Result<()> {
        match &self.remote {
            Some(remote) => {
                remote.send_step_result(&self.coordinator.topics().results, result)?;
                self.coordinator.pump_messages();
            }
            None => self.coordinator.handle_step_result(result),
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let path = self.coordinator.finish().map_err(|error| {
            let message = error.user_message();
            anyhow::Error::new(error).context(message)
        })?;
        self.result_path = path;
        Ok(())
    }

    fn drain_published(&mut self) {
        if let Some(remote) = &self.remote {
            self.published
                .extend(remote.published_states().into_iter().map(|(_, state)| state));
        }
    }

    pub fn report(&self) -> RunReport {
        let visits = self.visits.borrow();
        let ghosts = self.coordinator.ghosts();
        let study = self.coordinator.study();
        let highest_visit = visits.iter().max().map_or(0, |state| *state as usize + 1);
        let rows = self
            .configured_states
            .max(ghosts.state_count())
            .max(highest_visit);

        let states = (0..rows)
            .filter_map(|row| StateIndex::try_from(row).ok())
            .map(|index| StateSummary {
                index,
                objective: study.study().objective(index).text,
                input_required: study.is_input_required(index),
                snapshots: ghosts.snapshot(index as usize).map(|snapshot| snapshot.len()),
                visits: visits.iter().filter(|state| **state == index).count(),
            })
            .collect();

        RunReport {
            study: self.study_name.clone(),
            identifier: self.evaluator.borrow().identifier().to_string(),
            final_state: self.coordinator.current_state(),
            states,
            commands: self.commands,
            pushes_accepted: self.pushes_accepted,
            pushes_ignored: self.pushes_ignored,
            published: self.published.clone(),
            panel_text: self.panel.text(),
            result_path: self.result_path.clone(),
        }
    }
}
