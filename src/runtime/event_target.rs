//! Listener lists with explicit subscribe/unsubscribe handles.
//!
//! Models a host event source such as a media element. `subscribe` returns
//! a [`Subscription`]; dropping it or calling `unsubscribe` removes the
//! listener, so teardown never leaks a listener.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Listeners<E> {
    next_id: u64,
    entries: Vec<(u64, Listener<E>)>,
}

/// An event source that dispatches to its current listeners.
pub struct EventTarget<E> {
    listeners: Arc<Mutex<Listeners<E>>>,
}

impl<E: 'static> EventTarget<E> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = {
            let mut listeners = self.listeners.lock();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, Arc::new(listener)));
            id
        };

        let weak: Weak<Mutex<Listeners<E>>> = Arc::downgrade(&self.listeners);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(listeners) = weak.upgrade() {
                    listeners.lock().entries.retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    /// Deliver `event` to every listener registered at the time of the call.
    ///
    /// A listener removed by an earlier listener during the same dispatch is
    /// skipped.
    pub fn dispatch(&self, event: &E) {
        let snapshot: Vec<(u64, Listener<E>)> = self
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(id, listener)| (*id, listener.clone()))
            .collect();

        for (id, listener) in snapshot {
            let registered = self
                .listeners
                .lock()
                .entries
                .iter()
                .any(|(entry_id, _)| *entry_id == id);
            if registered {
                listener(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }
}

impl<E: 'static> Default for EventTarget<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration handle returned by [`EventTarget::subscribe`].
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.remove_now();
    }

    fn remove_now(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}
