//! Integration tests for ghost state capture, authoring and restore.

use std::cell::RefCell;
use std::rc::Rc;

use study_ghost::{GhostManager, ObjectSnapshot};
use study_model::{
    InMemoryScene, MaterialId, ObjectId, Quat, Scene, SceneError, SceneObject, SharedScene,
    StateChangeEvent, Transform, Vec3,
};
use study_state::StateController;

fn id(name: &str) -> ObjectId {
    ObjectId::new(name).unwrap()
}

fn at(x: f32) -> Transform {
    Transform::from_position(Vec3::new(x, 0.0, 0.0))
}

fn move_to(scene: &Rc<RefCell<InMemoryScene>>, name: &str, x: f32) {
    scene.borrow_mut().set_transform(&id(name), at(x)).unwrap();
}

fn position(scene: &Rc<RefCell<InMemoryScene>>, name: &str) -> f32 {
    scene.borrow().transform(&id(name)).unwrap().position.x
}

/// Scene with three ghosts `a`, `b`, `c` at x = 1, 2, 3, all tagged "ghost".
fn setup() -> (Rc<RefCell<InMemoryScene>>, GhostManager) {
    let mut scene = InMemoryScene::new();
    for (name, x) in [("a", 1.0), ("b", 2.0), ("c", 3.0)] {
        scene
            .insert(SceneObject::new(id(name)).with_tag("ghost").with_transform(at(x)))
            .unwrap();
    }
    let scene = scene.into_shared();
    let shared: SharedScene = scene.clone();
    (scene, GhostManager::new(shared))
}

#[test]
fn load_restores_all_tracked_objects() {
    let (scene, mut ghosts) = setup();
    assert_eq!(ghosts.add_to_tracking_by_tag("ghost"), 3);

    assert_eq!(ghosts.create_state(None).unwrap(), 0);
    assert_eq!(ghosts.state_count(), 1);

    move_to(&scene, "a", 10.0);
    move_to(&scene, "b", 20.0);
    scene.borrow_mut().set_active(&id("c"), false).unwrap();

    assert!(ghosts.load_state(0).unwrap());
    assert_eq!(position(&scene, "a"), 1.0);
    assert_eq!(position(&scene, "b"), 2.0);
    assert!(scene.borrow().is_active(&id("c")).unwrap());
}

#[test]
fn appended_states_match_capture_order() {
    let (scene, mut ghosts) = setup();
    ghosts.add_to_tracking_by_tag("ghost");

    let mut expected = Vec::new();
    for step in 0..4 {
        move_to(&scene, "a", step as f32 * 5.0);
        expected.push(ghosts.capture_current().unwrap());
        ghosts.create_state(None).unwrap();
    }

    assert_eq!(ghosts.state_count(), 4);
    assert_eq!(ghosts.states(), expected.as_slice());
}

#[test]
fn create_state_replaces_in_range_and_appends_otherwise() {
    let (scene, mut ghosts) = setup();
    ghosts.add_to_tracking_by_tag("ghost");
    for _ in 0..3 {
        ghosts.create_state(None).unwrap();
    }

    move_to(&scene, "a", 42.0);
    assert_eq!(ghosts.create_state(Some(1)).unwrap(), 1);
    assert_eq!(ghosts.state_count(), 3);
    assert_eq!(ghosts.snapshot(1).unwrap().get(0).unwrap().position.x, 42.0);
    assert_eq!(ghosts.snapshot(0).unwrap().get(0).unwrap().position.x, 1.0);

    assert_eq!(ghosts.create_state(Some(5)).unwrap(), 3);
    assert_eq!(ghosts.state_count(), 4);
}

#[test]
fn remove_state_ignores_out_of_range() {
    let (_scene, mut ghosts) = setup();
    ghosts.add_to_tracking_by_tag("ghost");
    ghosts.create_state(None).unwrap();
    ghosts.create_state(None).unwrap();

    assert!(ghosts.remove_state(9).is_none());
    assert_eq!(ghosts.state_count(), 2);
    assert!(ghosts.remove_state(0).is_some());
    assert_eq!(ghosts.state_count(), 1);
}

#[test]
fn loading_beyond_history_is_a_no_op() {
    let (scene, mut ghosts) = setup();
    ghosts.add_to_tracking_by_tag("ghost");
    ghosts.create_state(None).unwrap();
    move_to(&scene, "a", 7.0);

    assert!(!ghosts.load_state(1).unwrap());
    assert_eq!(position(&scene, "a"), 7.0);
}

#[test]
fn tracking_by_tag_is_a_union() {
    let (scene, mut ghosts) = setup();
    scene
        .borrow_mut()
        .insert(SceneObject::new(id("marker")).with_tag("marker"))
        .unwrap();

    assert!(ghosts.track(id("marker")));
    assert_eq!(ghosts.add_to_tracking_by_tag("ghost"), 3);
    assert_eq!(ghosts.add_to_tracking_by_tag("ghost"), 0);
    assert_eq!(ghosts.add_to_tracking_by_tag("marker"), 0);
    assert_eq!(
        ghosts.tracked(),
        &[id("marker"), id("a"), id("b"), id("c")]
    );
}

#[test]
fn update_missing_states_backfills_new_objects() {
    let mut scene = InMemoryScene::new();
    scene
        .insert(SceneObject::new(id("a")).with_transform(at(1.0)))
        .unwrap();
    scene
        .insert(SceneObject::new(id("b")).with_transform(at(2.0)))
        .unwrap();
    let scene = scene.into_shared();
    let shared: SharedScene = scene.clone();
    let mut ghosts = GhostManager::new(shared);
    ghosts.track(id("a"));
    ghosts.track(id("b"));

    ghosts.create_state(None).unwrap();
    move_to(&scene, "a", 10.0);
    move_to(&scene, "b", 20.0);
    ghosts.create_state(None).unwrap();
    let original: Vec<_> = ghosts.states().to_vec();

    scene
        .borrow_mut()
        .insert(SceneObject::new(id("c")).with_transform(at(3.0)))
        .unwrap();
    ghosts.track(id("c"));
    ghosts.update_missing_states().unwrap();

    for (index, state) in ghosts.states().iter().enumerate() {
        assert_eq!(state.len(), 3);
        assert_eq!(state.get(0), original[index].get(0));
        assert_eq!(state.get(1), original[index].get(1));
        assert_eq!(state.get(2).unwrap().object, id("c"));
    }
}

#[test]
fn set_state_fires_event_then_loads() {
    let (scene, mut ghosts) = setup();
    ghosts.add_to_tracking_by_tag("ghost");
    ghosts.create_state(None).unwrap();
    move_to(&scene, "a", 99.0);
    ghosts.create_state(None).unwrap();

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    ghosts.on_state_change(move |event| sink.borrow_mut().push(*event));

    ghosts.set_state(0);
    assert_eq!(position(&scene, "a"), 1.0);
    ghosts.next_state();
    assert_eq!(position(&scene, "a"), 99.0);
    ghosts.next_state();
    ghosts.reset_state();

    assert_eq!(ghosts.current_state(), 0);
    assert_eq!(position(&scene, "a"), 1.0);
    assert!(ghosts.is_user_input_active());
    assert_eq!(
        *events.borrow(),
        vec![
            StateChangeEvent::new(0, 0),
            StateChangeEvent::new(0, 1),
            StateChangeEvent::new(1, 2),
            StateChangeEvent::new(2, 0),
        ]
    );
}

#[test]
fn missing_object_does_not_abort_transition() {
    let (scene, mut ghosts) = setup();
    ghosts.add_to_tracking_by_tag("ghost");
    ghosts.create_state(None).unwrap();
    scene.borrow_mut().remove(&id("b"));

    ghosts.set_state(0);
    assert_eq!(ghosts.current_state(), 0);
    assert!(ghosts.load_state(0).is_err());
}

#[test]
fn vanished_object_does_not_stop_later_restores() {
    let (scene, mut ghosts) = setup();
    ghosts.add_to_tracking_by_tag("ghost");
    ghosts.create_state(None).unwrap();

    move_to(&scene, "a", 10.0);
    move_to(&scene, "c", 30.0);
    scene.borrow_mut().remove(&id("b"));

    ghosts.set_state(0);
    assert_eq!(position(&scene, "a"), 1.0);
    assert_eq!(position(&scene, "c"), 3.0);
    assert_eq!(
        ghosts.load_state(0),
        Err(SceneError::IncompleteRestore {
            failed: vec![id("b")]
        })
    );
}

#[test]
fn update_with_missing_tracked_object_leaves_history_alone() {
    let (scene, mut ghosts) = setup();
    ghosts.add_to_tracking_by_tag("ghost");
    ghosts.create_state(None).unwrap();
    move_to(&scene, "a", 10.0);
    ghosts.create_state(None).unwrap();
    let before = ghosts.states().to_vec();

    move_to(&scene, "c", 30.0);
    scene.borrow_mut().remove(&id("b"));

    assert_eq!(
        ghosts.update_missing_states(),
        Err(SceneError::UnknownObject(id("b")))
    );
    assert_eq!(ghosts.states(), before.as_slice());
    assert_eq!(position(&scene, "c"), 30.0);
}

#[test]
fn snapshot_serializes_with_weak_references() {
    let snapshot = ObjectSnapshot {
        object: id("cube"),
        enabled: true,
        parent: Some(id("table")),
        position: Vec3::new(1.0, 2.0, 3.0),
        rotation: Quat::IDENTITY,
        local_scale: Vec3::ONE,
        material: Some(MaterialId::new("blue").unwrap()),
    };
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["object"], "cube");
    assert_eq!(json["parent"], "table");
    assert_eq!(json["material"], "blue");
}
