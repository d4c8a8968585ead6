//! Ghost state manager.

use std::fmt;

use study_model::scene::Result;
use study_model::{ObjectId, SharedScene, StateChangeEvent, StateIndex};
use study_state::{ObserverId, StateChangeNotifier, StateController};

use crate::snapshot::SnapshotCollection;

/// Keeps one [`SnapshotCollection`] per state and restores it on entry.
///
/// States beyond the stored history are valid: loading them is a no-op, so
/// later states that only need prerequisites do not require a snapshot.
pub struct GhostManager {
    scene: SharedScene,
    tracked: Vec<ObjectId>,
    states: Vec<SnapshotCollection>,
    state: StateIndex,
    notifier: StateChangeNotifier,
}

impl GhostManager {
    pub fn new(scene: SharedScene) -> Self {
        Self {
            scene,
            tracked: Vec::new(),
            states: Vec::new(),
            state: 0,
            notifier: StateChangeNotifier::new(),
        }
    }

    /// Builds a manager with an existing history, e.g. one loaded from disk.
    pub fn with_states(
        scene: SharedScene,
        tracked: Vec<ObjectId>,
        states: Vec<SnapshotCollection>,
    ) -> Self {
        Self {
            tracked,
            states,
            ..Self::new(scene)
        }
    }

    /// Registers a state change observer.
    pub fn on_state_change(
        &mut self,
        observer: impl FnMut(&StateChangeEvent) + 'static,
    ) -> ObserverId {
        self.notifier.subscribe(observer)
    }

    pub fn notifier_mut(&mut self) -> &mut StateChangeNotifier {
        &mut self.notifier
    }

    // ---- Tracking ---------------------------------------------------------

    pub fn tracked(&self) -> &[ObjectId] {
        &self.tracked
    }

    /// Adds one object to tracking. Returns false if it was already tracked.
    pub fn track(&mut self, object: ObjectId) -> bool {
        if self.tracked.contains(&object) {
            return false;
        }
        self.tracked.push(object);
        true
    }

    /// Tracks every object carrying `tag` that is not tracked yet.
    ///
    /// Existing order is kept; new matches are appended in discovery order.
    /// Returns the number of objects added.
    pub fn add_to_tracking_by_tag(&mut self, tag: &str) -> usize {
        let candidates = self.scene.borrow().find_by_tag(tag);
        let added = candidates
            .into_iter()
            .filter(|object| self.track(object.clone()))
            .count();
        tracing::info!(tag, added, tracked = self.tracked.len(), "added objects to tracking");
        added
    }

    // ---- History ----------------------------------------------------------

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn states(&self) -> &[SnapshotCollection] {
        &self.states
    }

    pub fn snapshot(&self, index: usize) -> Option<&SnapshotCollection> {
        self.states.get(index)
    }

    /// Captures the live configuration of every tracked object.
    pub fn capture_current(&self) -> Result<SnapshotCollection> {
        SnapshotCollection::capture(&*self.scene.borrow(), &self.tracked)
    }

    /// Stores a fresh capture at `target` if it is an existing index,
    /// otherwise appends it.
    ///
    /// Returns the index that was written.
    pub fn create_state(&mut self, target: Option<usize>) -> Result<usize> {
        let collection = self.capture_current()?;
        match target {
            Some(index) if index < self.states.len() => {
                self.states[index] = collection;
                tracing::info!(index, "replaced ghost state");
                Ok(index)
            }
            _ => {
                self.states.push(collection);
                let index = self.states.len() - 1;
                tracing::info!(index, "appended ghost state");
                Ok(index)
            }
        }
    }

    /// Removes the state at `index`; out of range is a no-op.
    pub fn remove_state(&mut self, index: usize) -> Option<SnapshotCollection> {
        if index >= self.states.len() {
            return None;
        }
        tracing::info!(index, "removed ghost state");
        Some(self.states.remove(index))
    }

    /// Re-captures every stored state with the current tracking list.
    ///
    /// Each state is loaded first so objects already in it keep their stored
    /// configuration while newly tracked objects are filled in.
    ///
    /// Fails without touching the history or the scene if a tracked object
    /// is missing. A stored snapshot that cannot be applied is logged and
    /// the state is re-captured anyway.
    pub fn update_missing_states(&mut self) -> Result<()> {
        self.capture_current()?;
        for index in 0..self.states.len() {
            if let Err(error) = self.apply_index(index) {
                tracing::warn!(index, %error, "ghost state only partly restored before update");
            }
            self.states[index] = self.capture_current()?;
        }
        tracing::info!(states = self.states.len(), "updated ghost states with tracked objects");
        Ok(())
    }

    // ---- Loading ----------------------------------------------------------

    /// Restores the snapshots of `state`.
    ///
    /// Returns `Ok(false)` without touching the scene if no snapshot is
    /// stored for `state`.
    pub fn load_state(&mut self, state: StateIndex) -> Result<bool> {
        match usize::try_from(state) {
            Ok(index) if index < self.states.len() => {
                self.apply_index(index)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Restores the snapshots of the current state.
    pub fn load_current(&mut self) -> Result<bool> {
        self.load_state(self.state)
    }

    fn apply_index(&self, index: usize) -> Result<()> {
        self.states[index].apply(&mut *self.scene.borrow_mut())
    }
}

impl StateController for GhostManager {
    fn current_state(&self) -> StateIndex {
        self.state
    }

    fn set_state(&mut self, state: StateIndex) {
        self.notifier.fire(self.state, state);
        self.state = state;
        if let Err(error) = self.load_current() {
            tracing::warn!(state, %error, "failed to restore ghost state");
        }
    }
}

impl fmt::Debug for GhostManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GhostManager")
            .field("tracked", &self.tracked)
            .field("states", &self.states.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
