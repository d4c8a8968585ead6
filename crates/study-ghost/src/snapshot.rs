//! Snapshot value types.

use serde::{Deserialize, Serialize};
use study_model::scene::Result;
use study_model::{MaterialId, ObjectId, Quat, Scene, SceneError, Transform, Vec3};

/// Captured configuration of one tracked object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSnapshot {
    pub object: ObjectId,
    pub enabled: bool,
    pub parent: Option<ObjectId>,
    pub position: Vec3,
    pub rotation: Quat,
    pub local_scale: Vec3,
    /// Material shown by the object's renderer; `None` without a renderer.
    pub material: Option<MaterialId>,
}

impl ObjectSnapshot {
    /// Captures the live configuration of `object`. Reads only.
    pub fn capture(scene: &dyn Scene, object: &ObjectId) -> Result<Self> {
        let transform = scene.transform(object)?;
        Ok(Self {
            object: object.clone(),
            enabled: scene.is_active(object)?,
            parent: scene.parent(object)?,
            position: transform.position,
            rotation: transform.rotation,
            local_scale: transform.local_scale,
            material: capture_material(scene, object)?,
        })
    }

    /// Re-captures the live configuration of the object this snapshot is for.
    pub fn update(&mut self, scene: &dyn Scene) -> Result<()> {
        *self = Self::capture(scene, &self.object)?;
        Ok(())
    }

    /// Writes this snapshot back onto its object.
    pub fn apply(&self, scene: &mut dyn Scene) -> Result<()> {
        scene.set_active(&self.object, self.enabled)?;
        scene.set_transform(&self.object, self.transform())?;
        scene.set_parent(&self.object, self.parent.clone())?;
        if scene.has_renderer(&self.object)? {
            scene.set_material(&self.object, self.material.clone())?;
        }
        Ok(())
    }

    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
            local_scale: self.local_scale,
        }
    }
}

fn capture_material(scene: &dyn Scene, object: &ObjectId) -> Result<Option<MaterialId>> {
    if scene.has_renderer(object)? {
        scene.material(object)
    } else {
        Ok(None)
    }
}

/// Snapshots of every tracked object for one state.
///
/// Snapshot `i` belongs to the object tracked at position `i` when the
/// collection was captured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCollection {
    snapshots: Vec<ObjectSnapshot>,
}

impl SnapshotCollection {
    pub fn new(snapshots: Vec<ObjectSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Captures every object of `tracked`, preserving order.
    pub fn capture(scene: &dyn Scene, tracked: &[ObjectId]) -> Result<Self> {
        let snapshots = tracked
            .iter()
            .map(|object| ObjectSnapshot::capture(scene, object))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { snapshots })
    }

    /// Applies every snapshot in collection order.
    ///
    /// A snapshot that fails does not stop the others. The objects that
    /// failed are reported together in [`SceneError::IncompleteRestore`].
    pub fn apply(&self, scene: &mut dyn Scene) -> Result<()> {
        let mut failed = Vec::new();
        for snapshot in &self.snapshots {
            if let Err(error) = snapshot.apply(scene) {
                tracing::warn!(object = %snapshot.object, %error, "failed to restore object");
                failed.push(snapshot.object.clone());
            }
        }
        if failed.is_empty() {
            Ok(())
        } else {
            Err(SceneError::IncompleteRestore { failed })
        }
    }

    pub fn get(&self, index: usize) -> Option<&ObjectSnapshot> {
        self.snapshots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ObjectSnapshot> {
        self.snapshots.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ObjectSnapshot> {
        self.snapshots.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl<'a> IntoIterator for &'a SnapshotCollection {
    type Item = &'a ObjectSnapshot;
    type IntoIter = std::slice::Iter<'a, ObjectSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_model::{InMemoryScene, SceneError, SceneObject};

    fn id(name: &str) -> ObjectId {
        ObjectId::new(name).unwrap()
    }

    fn material(name: &str) -> MaterialId {
        MaterialId::new(name).unwrap()
    }

    fn scene() -> InMemoryScene {
        let mut scene = InMemoryScene::new();
        scene.insert(SceneObject::new(id("table"))).unwrap();
        scene
            .insert(
                SceneObject::new(id("cube"))
                    .with_transform(Transform::from_position(Vec3::new(1.0, 2.0, 3.0)))
                    .with_material(Some(material("blue"))),
            )
            .unwrap();
        scene
    }

    #[test]
    fn capture_reads_every_field() {
        let mut scene = scene();
        scene.set_parent(&id("cube"), Some(id("table"))).unwrap();

        let snapshot = ObjectSnapshot::capture(&scene, &id("cube")).unwrap();
        assert!(snapshot.enabled);
        assert_eq!(snapshot.parent, Some(id("table")));
        assert_eq!(snapshot.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(snapshot.material, Some(material("blue")));
    }

    #[test]
    fn object_without_renderer_has_no_material() {
        let snapshot = ObjectSnapshot::capture(&scene(), &id("table")).unwrap();
        assert_eq!(snapshot.material, None);
    }

    #[test]
    fn apply_restores_mutated_object() {
        let mut scene = scene();
        let snapshot = ObjectSnapshot::capture(&scene, &id("cube")).unwrap();

        scene.set_active(&id("cube"), false).unwrap();
        scene
            .set_transform(&id("cube"), Transform::from_position(Vec3::ZERO))
            .unwrap();
        scene.set_parent(&id("cube"), Some(id("table"))).unwrap();
        scene.set_material(&id("cube"), Some(material("red"))).unwrap();

        snapshot.apply(&mut scene).unwrap();
        assert_eq!(ObjectSnapshot::capture(&scene, &id("cube")).unwrap(), snapshot);
    }

    #[test]
    fn update_recaptures() {
        let mut scene = scene();
        let mut snapshot = ObjectSnapshot::capture(&scene, &id("cube")).unwrap();
        scene.set_active(&id("cube"), false).unwrap();

        snapshot.update(&scene).unwrap();
        assert!(!snapshot.enabled);
    }

    #[test]
    fn collection_apply_continues_past_missing_object() {
        let mut scene = scene();
        scene.insert(SceneObject::new(id("lamp"))).unwrap();
        let collection =
            SnapshotCollection::capture(&scene, &[id("table"), id("cube"), id("lamp")]).unwrap();

        scene.set_active(&id("table"), false).unwrap();
        scene.set_active(&id("lamp"), false).unwrap();
        scene.remove(&id("cube"));

        assert_eq!(
            collection.apply(&mut scene),
            Err(SceneError::IncompleteRestore {
                failed: vec![id("cube")]
            })
        );
        assert!(scene.is_active(&id("table")).unwrap());
        assert!(scene.is_active(&id("lamp")).unwrap());
    }

    #[test]
    fn capture_of_missing_object_fails() {
        let result = SnapshotCollection::capture(&scene(), &[id("cube"), id("gone")]);
        assert_eq!(result, Err(SceneError::UnknownObject(id("gone"))));
    }
}
