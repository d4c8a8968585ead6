use std::path::PathBuf;

use study_model::StateIndex;

/// Outcome of a scripted session.
#[derive(Debug)]
pub struct RunReport {
    pub study: String,
    pub identifier: String,
    pub final_state: StateIndex,
    pub states: Vec<StateSummary>,
    pub commands: usize,
    pub pushes_accepted: usize,
    pub pushes_ignored: usize,
    /// State indices seen by the remote endpoint, in publication order.
    pub published: Vec<StateIndex>,
    /// Text left on the panel when the session ended.
    pub panel_text: String,
    pub result_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSummary {
    pub index: StateIndex,
    pub objective: String,
    pub input_required: bool,
    /// Snapshots stored for the state, if it has a history entry.
    pub snapshots: Option<usize>,
    /// Times the session entered the state.
    pub visits: usize,
}
