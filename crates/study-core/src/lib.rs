//! Study session orchestration.
//!
//! - [`StudyStateManager`] gates transitions on prerequisites and runs the
//!   per-state setup supplied by a [`StudyDefinition`]
//! - [`SessionCoordinator`] drives a [`GhostManager`] and a
//!   [`StudyStateManager`] as one state machine, republishes the state over
//!   a [`StudyBridge`] and auto-progresses on remote step results
//! - [`generic`] holds reusable hook bodies and scene tools for studies
//!
//! [`GhostManager`]: study_ghost::GhostManager

pub mod bridge;
pub mod coordinator;
pub mod definition;
pub mod generic;
pub mod manager;
pub mod settings;

pub use bridge::{
    BridgeError, ChannelBridge, NoopBridge, RemoteEndpoint, StepResult, StudyBridge,
    channel_bridge,
};
pub use coordinator::{BridgeTopics, SessionCoordinator};
pub use definition::{DEFAULT_FAILURE_MESSAGE, DefaultStudy, Objective, StudyDefinition};
pub use manager::{StudyStateManager, TextStyles, Transition};
pub use settings::{Hand, StudySettings};
