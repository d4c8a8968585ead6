//! Push button effect advancing a controller.

use std::time::{Duration, Instant};

use crate::StateController;

/// Advances a controller when a physical button is pressed.
///
/// A press is accepted only when the controller waits for user input and
/// the lock interval since the last accepted press has passed. The lock is a
/// best-effort timestamp comparison, not a mutual exclusion primitive.
#[derive(Debug, Clone)]
pub struct IncrementStateEffect {
    lock_between_push: Duration,
    last_push: Option<Instant>,
}

impl Default for IncrementStateEffect {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl IncrementStateEffect {
    pub fn new(lock_between_push: Duration) -> Self {
        Self {
            lock_between_push,
            last_push: None,
        }
    }

    pub fn lock_between_push(&self) -> Duration {
        self.lock_between_push
    }

    /// Handles a button press now.
    ///
    /// Returns true if the press advanced the controller, so the host can
    /// give haptic feedback.
    pub fn on_button_down(&mut self, controller: &mut dyn StateController) -> bool {
        self.on_button_down_at(Instant::now(), controller)
    }

    /// Handles a button press that happened at `now`.
    pub fn on_button_down_at(
        &mut self,
        now: Instant,
        controller: &mut dyn StateController,
    ) -> bool {
        let unlocked = match self.last_push {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.lock_between_push,
        };

        if !controller.is_user_input_active() {
            tracing::debug!("button ignored: current state does not take user input");
            return false;
        }
        if !unlocked {
            tracing::debug!("button ignored: pressed again within lock interval");
            return false;
        }

        controller.next_state();
        self.last_push = Some(now);
        true
    }

    /// Button release; nothing happens on release.
    pub fn on_button_up(&mut self) {}
}
