//! Ghost snapshots for study sessions.
//!
//! A ghost is a tracked scene object whose configuration is captured per
//! state and restored when that state is entered. This crate provides:
//!
//! - [`ObjectSnapshot`] - one object's enabled flag, parent, transform and material
//! - [`SnapshotCollection`] - one snapshot per tracked object, in tracking order
//! - [`GhostManager`] - the snapshot history plus a [`StateController`] driving it
//!
//! [`StateController`]: study_state::StateController

mod manager;
mod snapshot;

pub use manager::GhostManager;
pub use snapshot::{ObjectSnapshot, SnapshotCollection};
