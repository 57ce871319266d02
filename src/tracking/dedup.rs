//! Session-scoped dedup registry.
//!
//! Ids only ever enter the registry. It lives as long as the tracking session
//! and is shared by `Arc`; remounting a component never resets it.

use std::collections::HashSet;

use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct TrackedEntityRegistry {
    ids: Mutex<HashSet<String>>,
}

impl TrackedEntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id`. Returns `true` only for the first call with a given id.
    ///
    /// Check and insert happen under one lock.
    pub fn mark(&self, id: &str) -> bool {
        let mut ids = self.ids.lock();
        if ids.contains(id) {
            return false;
        }
        ids.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.lock().contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.lock().is_empty()
    }
}
