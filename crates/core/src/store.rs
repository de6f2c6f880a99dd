//! Key-value persistence contract
//!
//! Leaderboard and settings are stored as plain strings under fixed keys. The
//! host decides where they live; [`MemoryStore`] is enough for tests and for
//! hosts that persist a map themselves.

use std::collections::HashMap;

/// String key to string value storage
pub trait KeyValueStore {
    /// Stored value, or `None` when the key is missing
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String);

    fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// In-memory [`KeyValueStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        (**self).set(key, value)
    }
}
