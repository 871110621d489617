//! State-change subscribers
//!
//! Observers register a callback and get every published snapshot exactly
//! once. Unsubscribing is explicit, through the [`Subscription`] handle.

use crate::types::PlaybackState;

/// Callback invoked with each published snapshot
pub type Listener = Box<dyn FnMut(&PlaybackState) + Send>;

/// Handle returned by `subscribe`, needed to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "dropping the handle makes the listener impossible to remove"]
pub struct Subscription(u64);

/// Registry of state listeners
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    listeners: Vec<(Subscription, Listener)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn subscribe(&mut self, listener: Listener) -> Subscription {
        let handle = Subscription(self.next_id);
        self.next_id += 1;
        self.listeners.push((handle, listener));
        handle
    }

    /// Remove a listener
    ///
    /// Returns false if the handle was already removed.
    pub fn unsubscribe(&mut self, handle: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(h, _)| *h != handle);
        self.listeners.len() != before
    }

    /// Deliver `state` to every listener
    pub fn publish(&mut self, state: &PlaybackState) {
        for (_, listener) in &mut self.listeners {
            listener(state);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.listeners.len())
            .finish()
    }
}
