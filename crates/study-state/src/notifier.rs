//! Ordered state change fan-out.

use std::fmt;

use study_model::{StateChangeEvent, StateIndex};

/// Callback invoked once per state transition.
pub type StateObserver = Box<dyn FnMut(&StateChangeEvent)>;

/// Handle returned by [`StateChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Synchronous list of observers, called in registration order.
///
/// Observers cannot reach the notifier while it is firing, so delivery is
/// never reentrant.
#[derive(Default)]
pub struct StateChangeNotifier {
    observers: Vec<(ObserverId, StateObserver)>,
    next_id: u64,
}

impl StateChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer; it is called after every observer registered
    /// before it.
    pub fn subscribe(&mut self, observer: impl FnMut(&StateChangeEvent) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Delivers `old -> new` to every observer.
    pub fn fire(&mut self, old_state: StateIndex, new_state: StateIndex) {
        let event = StateChangeEvent::new(old_state, new_state);
        tracing::debug!(%event, observers = self.observers.len(), "state change");
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for StateChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateChangeNotifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}
