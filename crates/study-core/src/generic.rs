//! Reusable hook bodies and scene tools for study definitions.

use study_model::scene::Result;
use study_model::{Color, ObjectId, Quat, Scene, Transform, Vec3};

use crate::definition::Objective;

/// Prerequisite check that always passes.
pub fn check_true() -> bool {
    true
}

/// Setup that changes nothing.
pub fn setup_none() -> bool {
    true
}

/// Objective shown while a state waits on an external system.
pub fn objective_wait() -> Objective {
    Objective::new("Please Wait...").with_color(Color::YELLOW)
}

/// Failure message for states without a specific one.
pub fn error_generic() -> String {
    "State Failed: Unknown Reason".to_string()
}

pub fn enable(scene: &mut dyn Scene, object: &ObjectId) -> Result<()> {
    scene.set_active(object, true)
}

pub fn disable(scene: &mut dyn Scene, object: &ObjectId) -> Result<()> {
    scene.set_active(object, false)
}

/// Makes `parent` the parent of `child`.
pub fn attach(scene: &mut dyn Scene, child: &ObjectId, parent: &ObjectId) -> Result<()> {
    scene.set_parent(child, Some(parent.clone()))
}

pub fn detach(scene: &mut dyn Scene, child: &ObjectId) -> Result<()> {
    scene.set_parent(child, None)
}

/// Sets position, rotation (Euler angles in degrees) and local scale.
pub fn set_transform(
    scene: &mut dyn Scene,
    object: &ObjectId,
    position: Vec3,
    euler_degrees: Vec3,
    scale: Vec3,
) -> Result<()> {
    let rotation = Quat::from_euler_degrees(euler_degrees.x, euler_degrees.y, euler_degrees.z);
    scene.set_transform(
        object,
        Transform {
            position,
            rotation,
            local_scale: scale,
        },
    )
}
