//! # void_event - Synchronous Signals
//!
//! Ordered observer registry used for in-process notifications:
//! - Handlers are invoked synchronously, in registration order
//! - Emission works on a snapshot, so handlers may subscribe, unsubscribe
//!   or query the emitting component while being called
//! - Subscriber IDs are never reused within a signal

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Trait for events
pub trait Event: Send + Sync + 'static {}

// Blanket implementation
impl<T: Send + Sync + 'static> Event for T {}

/// Event handler function type
pub type EventHandler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

struct Listeners<E> {
    entries: Vec<(SubscriberId, EventHandler<E>)>,
    next_subscriber_id: u64,
}

/// An ordered list of handlers for a single event type
pub struct Signal<E: Event> {
    listeners: Mutex<Listeners<E>>,
}

impl<E: Event> Signal<E> {
    /// Create an empty signal
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Listeners {
                entries: Vec::new(),
                next_subscriber_id: 1,
            }),
        }
    }

    /// Register a handler. It runs after every handler registered before it.
    pub fn subscribe<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock();
        let id = SubscriberId(listeners.next_subscriber_id);
        listeners.next_subscriber_id += 1;
        listeners.entries.push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns false if the id is unknown.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.entries.len();
        listeners.entries.retain(|(sub_id, _)| *sub_id != id);
        listeners.entries.len() != before
    }

    /// Invoke every handler with `event`
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<EventHandler<E>> = self
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in snapshot {
            handler(event);
        }
    }

    /// Number of registered handlers
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }

    /// Check if nothing is listening
    pub fn is_empty(&self) -> bool {
        self.listener_count() == 0
    }

    /// Remove all handlers
    pub fn clear(&self) {
        self.listeners.lock().entries.clear();
    }
}

impl<E: Event> Default for Signal<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("event", &std::any::type_name::<E>())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::{Event, EventHandler, Signal, SubscriberId};
}
