//! Live object collaborator.
//!
//! The engine runtime that owns scene objects is external. Controllers
//! only see it through the [`Scene`] accessor trait, keyed by
//! [`ObjectId`]. [`InMemoryScene`] is a self-contained implementation used
//! by the command line host and by tests.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::geometry::Transform;
use crate::ids::{MaterialId, ObjectId};

/// Result type alias for scene accessors.
pub type Result<T> = std::result::Result<T, SceneError>;

/// Value accessors for the live configuration of scene objects.
///
/// Every accessor fails with [`SceneError::UnknownObject`] when the id no
/// longer resolves to an object.
pub trait Scene {
    /// Returns true if the id resolves to an object.
    fn contains(&self, id: &ObjectId) -> bool;

    /// Returns every object carrying `tag`, in discovery order.
    fn find_by_tag(&self, tag: &str) -> Vec<ObjectId>;

    fn is_active(&self, id: &ObjectId) -> Result<bool>;
    fn set_active(&mut self, id: &ObjectId, active: bool) -> Result<()>;

    fn parent(&self, id: &ObjectId) -> Result<Option<ObjectId>>;
    fn set_parent(&mut self, id: &ObjectId, parent: Option<ObjectId>) -> Result<()>;

    fn transform(&self, id: &ObjectId) -> Result<Transform>;
    fn set_transform(&mut self, id: &ObjectId, transform: Transform) -> Result<()>;

    /// Returns true if the object can display a material.
    fn has_renderer(&self, id: &ObjectId) -> Result<bool>;
    fn material(&self, id: &ObjectId) -> Result<Option<MaterialId>>;
    fn set_material(&mut self, id: &ObjectId, material: Option<MaterialId>) -> Result<()>;
}

/// Scene handle shared between the controllers of one session.
pub type SharedScene = Rc<RefCell<dyn Scene>>;

/// One object of an [`InMemoryScene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: ObjectId,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub parent: Option<ObjectId>,
    #[serde(flatten)]
    pub transform: Transform,
    /// Whether the object has a renderer able to show a material.
    #[serde(default)]
    pub renderer: bool,
    #[serde(default)]
    pub material: Option<MaterialId>,
}

fn default_active() -> bool {
    true
}

impl SceneObject {
    pub fn new(name: ObjectId) -> Self {
        Self {
            name,
            tag: None,
            active: true,
            parent: None,
            transform: Transform::default(),
            renderer: false,
            material: None,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: Option<MaterialId>) -> Self {
        self.renderer = true;
        self.material = material;
        self
    }
}

/// Scene held entirely in memory, objects kept in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryScene {
    objects: Vec<SceneObject>,
}

impl InMemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the scene into a shareable handle.
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    pub fn insert(&mut self, object: SceneObject) -> Result<()> {
        if self.contains(&object.name) {
            return Err(SceneError::DuplicateObject(object.name));
        }
        self.objects.push(object);
        Ok(())
    }

    /// Removes an object, leaving dangling references to it in place.
    pub fn remove(&mut self, id: &ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|o| &o.name == id)?;
        Some(self.objects.remove(index))
    }

    pub fn get(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| &o.name == id)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn lookup(&self, id: &ObjectId) -> Result<&SceneObject> {
        self.get(id)
            .ok_or_else(|| SceneError::UnknownObject(id.clone()))
    }

    fn lookup_mut(&mut self, id: &ObjectId) -> Result<&mut SceneObject> {
        self.objects
            .iter_mut()
            .find(|o| &o.name == id)
            .ok_or_else(|| SceneError::UnknownObject(id.clone()))
    }
}

impl Scene for InMemoryScene {
    fn contains(&self, id: &ObjectId) -> bool {
        self.get(id).is_some()
    }

    fn find_by_tag(&self, tag: &str) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.tag.as_deref() == Some(tag))
            .map(|o| o.name.clone())
            .collect()
    }

    fn is_active(&self, id: &ObjectId) -> Result<bool> {
        Ok(self.lookup(id)?.active)
    }

    fn set_active(&mut self, id: &ObjectId, active: bool) -> Result<()> {
        self.lookup_mut(id)?.active = active;
        Ok(())
    }

    fn parent(&self, id: &ObjectId) -> Result<Option<ObjectId>> {
        Ok(self.lookup(id)?.parent.clone())
    }

    fn set_parent(&mut self, id: &ObjectId, parent: Option<ObjectId>) -> Result<()> {
        if let Some(parent) = &parent {
            if !self.contains(parent) {
                return Err(SceneError::UnknownObject(parent.clone()));
            }
        }
        self.lookup_mut(id)?.parent = parent;
        Ok(())
    }

    fn transform(&self, id: &ObjectId) -> Result<Transform> {
        Ok(self.lookup(id)?.transform)
    }

    fn set_transform(&mut self, id: &ObjectId, transform: Transform) -> Result<()> {
        self.lookup_mut(id)?.transform = transform;
        Ok(())
    }

    fn has_renderer(&self, id: &ObjectId) -> Result<bool> {
        Ok(self.lookup(id)?.renderer)
    }

    fn material(&self, id: &ObjectId) -> Result<Option<MaterialId>> {
        let object = self.lookup(id)?;
        Ok(if object.renderer {
            object.material.clone()
        } else {
            None
        })
    }

    fn set_material(&mut self, id: &ObjectId, material: Option<MaterialId>) -> Result<()> {
        let object = self.lookup_mut(id)?;
        if object.renderer {
            object.material = material;
        }
        Ok(())
    }
}
