//! Evaluator configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Identification and output settings of a [`StudyEvaluator`](crate::StudyEvaluator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Name of the study, written to the header.
    pub study_name: String,

    /// Pattern for the session identifier; `{0}` is the counter value and
    /// `{0:D3}` zero-pads it to three digits.
    pub identifier_pattern: String,

    /// Version of the study protocol, written to the header.
    pub version: i32,

    /// Path of the identifier counter file.
    pub config_path: PathBuf,

    /// Directory receiving `<identifier>.json`.
    pub base_path: PathBuf,

    /// Directory for sidecar data files, relative to `base_path/<identifier>`.
    pub data_path: String,

    /// Spaces added per nesting level.
    pub indent: usize,

    /// Drop the separator before closing brackets so output is strict JSON.
    pub strict_json: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            study_name: String::new(),
            identifier_pattern: "{0}".to_string(),
            version: 1,
            config_path: PathBuf::from("study/config/evaluator.json"),
            base_path: PathBuf::from("study/results"),
            data_path: "data/".to_string(),
            indent: 2,
            strict_json: false,
        }
    }
}

impl EvaluatorConfig {
    pub fn new(study_name: impl Into<String>) -> Self {
        Self {
            study_name: study_name.into(),
            ..Default::default()
        }
    }
}
