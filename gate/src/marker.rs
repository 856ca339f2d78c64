//! Non-authoritative "logged in" marker.
//!
//! The marker gives the navigation guard a fast hint before the first
//! status check settles. It is never a security boundary: the backend
//! cookie decides, and the store overwrites the marker on every settled
//! operation. In a browser this sits in local storage; native embedders
//! and tests use the in-memory implementation.

#[cfg(test)]
#[path = "marker_test.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Mutex;

/// Keyed boolean storage for the per-domain logged-in markers.
pub trait MarkerStore: Send + Sync {
    /// Read a marker; absent keys read as false.
    fn get(&self, key: &str) -> bool;
    /// Write a marker.
    fn set(&self, key: &str, value: bool);
}

/// In-memory [`MarkerStore`].
#[derive(Debug, Default)]
pub struct MemoryMarker {
    flags: Mutex<HashMap<String, bool>>,
}

impl MemoryMarker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkerStore for MemoryMarker {
    fn get(&self, key: &str) -> bool {
        self.flags
            .lock()
            .map_or(false, |flags| flags.get(key).copied().unwrap_or(false))
    }

    fn set(&self, key: &str, value: bool) {
        if let Ok(mut flags) = self.flags.lock() {
            flags.insert(key.to_owned(), value);
        }
    }
}
