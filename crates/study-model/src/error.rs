use thiserror::Error;

use crate::ids::ObjectId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid object id: {0:?}")]
    InvalidObjectId(String),
    #[error("invalid material id: {0:?}")]
    InvalidMaterialId(String),
}

/// Error raised by the live object collaborator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The object is not (or no longer) part of the scene.
    #[error("object not found in scene: {0}")]
    UnknownObject(ObjectId),

    /// An object with this id already exists.
    #[error("object already exists in scene: {0}")]
    DuplicateObject(ObjectId),

    /// Some snapshots of a collection could not be applied; the others were.
    #[error("{} object(s) could not be restored: {}", .failed.len(), join_ids(.failed))]
    IncompleteRestore { failed: Vec<ObjectId> },
}

fn join_ids(ids: &[ObjectId]) -> String {
    ids.iter()
        .map(ObjectId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
