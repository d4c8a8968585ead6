//! End-to-end runs of scripted sessions.

use std::fs;
use std::path::Path;

use study_cli::commands::{init_config, run_session};
use study_cli::config::SessionConfig;
use study_cli::script::parse_script;
use study_cli::session::Session;
use study_model::{ObjectId, Scene, Vec3};

const CONFIG: &str = r#"
[study]
name = "Pick and Place"
identifier_pattern = "P{0:D3}"

[[study.states]]
objective = "Pick up the cup"
input_required = true

[[study.states]]
objective = "Place the cup on the marker"
input_required = true
requires_active = ["cup"]
enable = ["ghost_cup"]

[[study.states]]
objective = "Please Wait..."
objective_color = { r = 1.0, g = 0.92, b = 0.016 }

[evaluator]
strict_json = true

[settings]
dominant_hand = "left"

[scene]
track = ["table"]
track_tags = ["ghost"]

[[scene.objects]]
name = "table"

[[scene.objects]]
name = "cup"
tag = "ghost"
position = { x = 0.0, y = 0.8, z = 0.2 }

[[scene.objects]]
name = "ghost_cup"
active = false
"#;

const SCRIPT: &str = "\
# record two ghost states
capture
move cup 1 0.8 0
capture

press
press
result 1 ok placed
next
result 2 ok done
result 3 error timeout
finish
";

/// Starts a session whose evaluator files live under `dir`.
fn session_in(dir: &Path, config: &str) -> Session {
    let mut config: SessionConfig = toml::from_str(config).unwrap();
    config.resolve_paths(dir);
    Session::start(&config).unwrap()
}

fn write_session(dir: &Path, config: &str, script: &str) -> (std::path::PathBuf, std::path::PathBuf) {
    let config_path = dir.join("study.toml");
    let script_path = dir.join("session.txt");
    fs::write(&config_path, config).unwrap();
    fs::write(&script_path, script).unwrap();
    (config_path, script_path)
}

#[test]
fn scripted_session_produces_report_and_log() {
    let dir = tempfile::tempdir().unwrap();
    let (config_path, script_path) = write_session(dir.path(), CONFIG, SCRIPT);

    let report = run_session(&config_path, &script_path).unwrap();

    assert_eq!(report.identifier, "P001");
    assert_eq!(report.final_state, 3);
    assert_eq!(report.commands, 10);
    assert_eq!((report.pushes_accepted, report.pushes_ignored), (1, 1));
    assert_eq!(report.published, vec![0, 1, 2, 3]);
    assert_eq!(report.panel_text, "timeout");

    let objectives: Vec<&str> = report.states.iter().map(|s| s.objective.as_str()).collect();
    assert_eq!(
        objectives,
        [
            "Pick up the cup",
            "Place the cup on the marker",
            "Please Wait...",
            "No Objectives"
        ]
    );
    let snapshots: Vec<Option<usize>> = report.states.iter().map(|s| s.snapshots).collect();
    assert_eq!(snapshots, [Some(2), Some(2), None, None]);
    assert!(report.states.iter().all(|s| s.visits == 1));

    let path = report.result_path.unwrap();
    assert_eq!(path, dir.path().join("study/results/P001.json"));
    let log: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    let session = &log[0];
    assert_eq!(session["study"], "Pick and Place");
    assert_eq!(session["dominantHand"], "left");

    let states = session["states"].as_array().unwrap();
    assert_eq!(states.len(), 4);
    // State 1 restored the second capture before its block was closed.
    let position: Vec<f64> = states[1]["objects"]["cup"]["position"]
        .as_array()
        .unwrap()
        .iter()
        .map(|value| value.as_f64().unwrap())
        .collect();
    assert_eq!(position, [1.0, 0.8, 0.0]);

    let counter = fs::read_to_string(dir.path().join("study/config/evaluator.json")).unwrap();
    assert!(counter.contains("\"identifierIdx\": 1"));
}

#[test]
fn prerequisites_gate_the_button() {
    let dir = tempfile::tempdir().unwrap();
    let config = CONFIG.replace("name = \"cup\"", "name = \"cup\"\nactive = false");
    let mut session = session_in(dir.path(), &config);
    let script = parse_script("press\n").unwrap();
    for line in &script {
        session.execute(&line.command).unwrap();
    }

    let report = session.report();
    assert_eq!(report.final_state, 0);
    assert_eq!(report.pushes_accepted, 1);
    assert_eq!(
        report.panel_text,
        "ERROR: Not all requirements fulfilled to perform next state"
    );
}

#[test]
fn state_setup_enables_objects() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path(), CONFIG);
    let ghost_cup = ObjectId::new("ghost_cup").unwrap();
    assert!(!session.scene().borrow().is_active(&ghost_cup).unwrap());

    for line in parse_script("set 1").unwrap() {
        session.execute(&line.command).unwrap();
    }
    assert!(session.scene().borrow().is_active(&ghost_cup).unwrap());
    assert_eq!(session.panel().text(), "Place the cup on the marker");
}

#[test]
fn bad_script_line_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (config_path, script_path) = write_session(dir.path(), CONFIG, "next\njump 3\n");

    let error = run_session(&config_path, &script_path).unwrap_err();
    insta::assert_snapshot!(error.root_cause().to_string(), @"line 2: unknown command 'jump'");
}

#[test]
fn moving_an_unknown_object_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let (config_path, script_path) = write_session(dir.path(), CONFIG, "move lamp 0 0 0\n");

    let error = run_session(&config_path, &script_path).unwrap_err();
    assert_eq!(error.to_string(), "script line 1");
}

#[test]
fn commands_after_finish_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path(), CONFIG);
    let script = parse_script("finish\nnext\n").unwrap();

    session.execute(&script[0].command).unwrap();
    assert!(session.is_finished());
    assert!(session.execute(&script[1].command).is_err());
}

#[test]
fn init_config_round_trips_and_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("study.toml");

    init_config(&path, false).unwrap();
    let loaded = SessionConfig::load_from(&path).unwrap();
    assert_eq!(loaded, SessionConfig::example().unwrap());

    assert!(init_config(&path, false).is_err());
    init_config(&path, true).unwrap();
}

#[test]
fn disabled_bridge_still_auto_progresses() {
    let dir = tempfile::tempdir().unwrap();
    let config = format!("{CONFIG}\n[bridge]\nenabled = false\n");
    let mut session = session_in(dir.path(), &config);

    for line in parse_script("set 2\nresult 2 ok done\n").unwrap() {
        session.execute(&line.command).unwrap();
    }
    let report = session.report();
    assert_eq!(report.final_state, 3);
    assert!(report.published.is_empty());
    assert_eq!(
        session.scene().borrow().transform(&ObjectId::new("cup").unwrap()).unwrap().position,
        Vec3::new(0.0, 0.8, 0.2)
    );
}

#[test]
fn objects_tracked_mid_session_are_logged() {
    let dir = tempfile::tempdir().unwrap();
    let config = CONFIG.replace("track_tags = [\"ghost\"]", "track_tags = []");
    let mut session = session_in(dir.path(), &config);

    for line in parse_script("track ghost\nset 1\nfinish\n").unwrap() {
        session.execute(&line.command).unwrap();
    }
    let path = session.report().result_path.unwrap();
    let log: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    let objects = &log[0]["states"][0]["objects"];
    assert!(objects["table"].is_object());
    assert!(objects["cup"]["position"].is_array());
}

#[test]
fn infinite_button_lock_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = format!("{CONFIG}\n[button]\nlock_between_push = inf\n");
    let mut config: SessionConfig = toml::from_str(&config).unwrap();
    config.resolve_paths(dir.path());

    let error = Session::start(&config).err().unwrap();
    assert!(error.to_string().starts_with("button.lock_between_push"));
}
