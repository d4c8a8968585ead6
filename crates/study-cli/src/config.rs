//! Session configuration file.
//!
//! Every section is optional; a missing file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use study_core::{BridgeTopics, Hand, StudySettings};
use study_eval::EvaluatorConfig;
use study_model::{Color, InMemoryScene, ObjectId, SceneObject, Transform, Vec3};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub study: StudySection,
    pub evaluator: EvaluatorSection,
    pub bridge: BridgeSection,
    pub button: ButtonSection,
    pub settings: StudySettings,
    pub scene: SceneSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudySection {
    pub name: String,
    pub identifier_pattern: String,
    pub version: i32,
    pub display_objectives: bool,
    /// Replaces the default rejected-transition message.
    pub failure_message: Option<String>,
    pub states: Vec<StateSpec>,
}

impl Default for StudySection {
    fn default() -> Self {
        Self {
            name: "Study".to_string(),
            identifier_pattern: "{0}".to_string(),
            version: 1,
            display_objectives: true,
            failure_message: None,
            states: Vec::new(),
        }
    }
}

/// Behaviour of one study state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSpec {
    pub objective: Option<String>,
    pub objective_color: Option<Color>,
    pub input_required: bool,
    /// Objects that must be active to enter the state.
    pub requires_active: Vec<ObjectId>,
    pub enable: Vec<ObjectId>,
    pub disable: Vec<ObjectId>,
    pub failure_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorSection {
    pub config_path: PathBuf,
    pub base_path: PathBuf,
    pub data_path: String,
    pub indent: usize,
    pub strict_json: bool,
}

impl Default for EvaluatorSection {
    fn default() -> Self {
        let defaults = EvaluatorConfig::default();
        Self {
            config_path: defaults.config_path,
            base_path: defaults.base_path,
            data_path: defaults.data_path,
            indent: defaults.indent,
            strict_json: defaults.strict_json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSection {
    /// Connect the in-process remote endpoint.
    pub enabled: bool,
    pub step_topic: String,
    pub result_topic: String,
}

impl Default for BridgeSection {
    fn default() -> Self {
        let topics = BridgeTopics::default();
        Self {
            enabled: true,
            step_topic: topics.step,
            result_topic: topics.results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonSection {
    /// Minimum seconds between two accepted pushes.
    pub lock_between_push: f64,
}

impl ButtonSection {
    /// The push lock as a duration. Negative, infinite and NaN values are
    /// rejected.
    pub fn lock_duration(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.lock_between_push).with_context(|| {
            format!(
                "button.lock_between_push: {} is not a valid number of seconds",
                self.lock_between_push
            )
        })
    }
}

impl Default for ButtonSection {
    fn default() -> Self {
        Self {
            lock_between_push: 10.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSection {
    /// Objects tracked by name, in order.
    pub track: Vec<ObjectId>,
    /// Tags whose objects are tracked after `track`.
    pub track_tags: Vec<String>,
    pub objects: Vec<SceneObject>,
}

impl SessionConfig {
    /// Loads a config file; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no session config, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("read session config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parse session config {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("serialize session config")?;
        fs::write(path, content).with_context(|| format!("write session config {}", path.display()))
    }

    /// Makes relative evaluator paths relative to `root`.
    pub fn resolve_paths(&mut self, root: &Path) {
        for path in [
            &mut self.evaluator.config_path,
            &mut self.evaluator.base_path,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
    }

    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            study_name: self.study.name.clone(),
            identifier_pattern: self.study.identifier_pattern.clone(),
            version: self.study.version,
            config_path: self.evaluator.config_path.clone(),
            base_path: self.evaluator.base_path.clone(),
            data_path: self.evaluator.data_path.clone(),
            indent: self.evaluator.indent,
            strict_json: self.evaluator.strict_json,
        }
    }

    pub fn topics(&self) -> BridgeTopics {
        BridgeTopics {
            step: self.bridge.step_topic.clone(),
            results: self.bridge.result_topic.clone(),
        }
    }

    /// Builds the scene, rejecting duplicate object names.
    pub fn build_scene(&self) -> Result<InMemoryScene> {
        let mut scene = InMemoryScene::new();
        for object in &self.scene.objects {
            scene
                .insert(object.clone())
                .with_context(|| format!("scene object {}", object.name))?;
        }
        Ok(scene)
    }

    /// A small pick-and-place session used by `init-config`.
    pub fn example() -> Result<Self> {
        let table = ObjectId::new("table")?;
        let cup = ObjectId::new("cup")?;
        let ghost_cup = ObjectId::new("ghost_cup")?;

        let objects = vec![
            SceneObject::new(table.clone()),
            SceneObject::new(cup.clone())
                .with_tag("ghost")
                .with_transform(Transform::from_position(Vec3::new(0.0, 0.8, 0.2))),
            SceneObject::new(ghost_cup.clone()),
        ];
        let states = vec![
            StateSpec {
                objective: Some("Pick up the cup".to_string()),
                input_required: true,
                ..StateSpec::default()
            },
            StateSpec {
                objective: Some("Place the cup on the marker".to_string()),
                input_required: true,
                requires_active: vec![cup],
                enable: vec![ghost_cup],
                ..StateSpec::default()
            },
            StateSpec {
                objective: Some("Please Wait...".to_string()),
                objective_color: Some(Color::YELLOW),
                ..StateSpec::default()
            },
        ];

        Ok(Self {
            study: StudySection {
                name: "Pick and Place".to_string(),
                identifier_pattern: "P{0:D3}".to_string(),
                states,
                ..StudySection::default()
            },
            settings: StudySettings {
                dominant_hand: Hand::Right,
            },
            scene: SceneSection {
                track: vec![table],
                track_tags: vec!["ghost".to_string()],
                objects,
            },
            ..Self::default()
        })
    }
}
