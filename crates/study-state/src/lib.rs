//! State controller contract shared by every study session component.
//!
//! - [`StateController`] - the `{set, next, reset, is_user_input_active}` capability
//! - [`StateChangeNotifier`] - ordered fan-out of [`StateChangeEvent`]s
//! - [`IncrementStateEffect`] - debounced push button advancing a controller
//! - [`ManualTester`] - operator driver for setting states by hand

mod controller;
mod effect;
mod manual;
mod notifier;

pub use controller::StateController;
pub use effect::IncrementStateEffect;
pub use manual::ManualTester;
pub use notifier::{ObserverId, StateChangeNotifier, StateObserver};

pub use study_model::{StateChangeEvent, StateIndex};
