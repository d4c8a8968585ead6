//! Shared value types for study session orchestration.
//!
//! This crate holds everything the controllers exchange without owning:
//!
//! - `geometry` - positions, orientations and transforms
//! - `ids` - weak references to scene objects and materials
//! - `event` - state indices and state change events
//! - `scene` - the live object collaborator and an in-memory implementation
//! - `text` - the text output side channel used for objectives and errors

pub mod error;
pub mod event;
pub mod geometry;
pub mod ids;
pub mod scene;
pub mod text;

pub use error::{ModelError, SceneError};
pub use event::{StateChangeEvent, StateIndex};
pub use geometry::{Quat, Transform, Vec3};
pub use ids::{MaterialId, ObjectId};
pub use scene::{InMemoryScene, Scene, SceneObject, SharedScene};
pub use text::{Color, DisplayedText, FontStyle, TextOutput, TextPanel};
