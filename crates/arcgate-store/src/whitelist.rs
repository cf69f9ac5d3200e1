//! Pending whitelist entries.

use std::collections::HashSet;

use parking_lot::Mutex;

/// Identifiers approved before the player's first successful login.
///
/// An entry is either a display name or the hyphenated string form of a
/// remote identity. The pipeline consumes an entry (removes it and marks
/// the player's record whitelisted) the first time a matching player
/// verifies; the administrative surface adds and removes entries directly.
///
/// Every operation runs under a single mutex, so concurrent `add` and
/// `remove` calls are linearizable: of two racing `remove`s for the same
/// entry, exactly one returns `true`.
#[derive(Debug, Default)]
pub struct WhitelistCache {
    entries: Mutex<HashSet<String>>,
}

impl WhitelistCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. Returns `false` if it was already pending.
    pub fn add(&self, id: impl Into<String>) -> bool {
        self.entries.lock().insert(id.into())
    }

    /// Removes an entry. Returns `false` if it was not pending.
    pub fn remove(&self, id: &str) -> bool {
        self.entries.lock().remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.lock().contains(id)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// A sorted copy of every pending entry.
    pub fn entries(&self) -> Vec<String> {
        let mut entries: Vec<String> =
            self.entries.lock().iter().cloned().collect();
        entries.sort();
        entries
    }
}

impl<S: Into<String>> FromIterator<S> for WhitelistCache {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: Mutex::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}
