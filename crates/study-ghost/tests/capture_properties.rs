//! Property tests: applying a capture restores every captured field.

use proptest::prelude::*;

use study_ghost::SnapshotCollection;
use study_model::{
    InMemoryScene, MaterialId, ObjectId, Quat, Scene, SceneObject, Transform, Vec3,
};

fn vec3() -> impl Strategy<Value = Vec3> {
    (-1000.0f32..1000.0, -1000.0f32..1000.0, -1000.0f32..1000.0)
        .prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn quat() -> impl Strategy<Value = Quat> {
    (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0)
        .prop_map(|(x, y, z, w)| Quat::new(x, y, z, w))
}

#[derive(Debug, Clone)]
struct Config {
    active: bool,
    attached: bool,
    transform: Transform,
    material: Option<u8>,
}

fn config() -> impl Strategy<Value = Config> {
    (any::<bool>(), any::<bool>(), vec3(), quat(), vec3(), proptest::option::of(0u8..4)).prop_map(
        |(active, attached, position, rotation, local_scale, material)| Config {
            active,
            attached,
            transform: Transform {
                position,
                rotation,
                local_scale,
            },
            material,
        },
    )
}

fn id(name: &str) -> ObjectId {
    ObjectId::new(name).unwrap()
}

fn configure(scene: &mut InMemoryScene, object: &ObjectId, config: &Config) {
    scene.set_active(object, config.active).unwrap();
    scene.set_transform(object, config.transform).unwrap();
    let parent = config.attached.then(|| id("anchor"));
    scene.set_parent(object, parent).unwrap();
    let material = config
        .material
        .map(|n| MaterialId::new(format!("material_{n}")).unwrap());
    scene.set_material(object, material).unwrap();
}

proptest! {
    #[test]
    fn apply_after_capture_restores_configuration(
        before in proptest::collection::vec(config(), 1..6),
        after in proptest::collection::vec(config(), 6),
    ) {
        let mut scene = InMemoryScene::new();
        scene.insert(SceneObject::new(id("anchor"))).unwrap();
        let tracked: Vec<ObjectId> = (0..before.len()).map(|i| id(&format!("ghost_{i}"))).collect();
        for object in &tracked {
            scene.insert(SceneObject::new(object.clone()).with_material(None)).unwrap();
        }

        for (object, config) in tracked.iter().zip(&before) {
            configure(&mut scene, object, config);
        }
        let captured = SnapshotCollection::capture(&scene, &tracked).unwrap();

        for (object, config) in tracked.iter().zip(&after) {
            configure(&mut scene, object, config);
        }
        captured.apply(&mut scene).unwrap();

        let restored = SnapshotCollection::capture(&scene, &tracked).unwrap();
        prop_assert_eq!(restored, captured);
    }
}
