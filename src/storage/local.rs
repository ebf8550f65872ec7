use super::map::ConcurrentMap;
use std::collections::HashMap;

/// The node's own key-value partition.
///
/// Only local `put`/`delete` calls and the configured seed write here.
/// Nothing in this store is ever replicated to peers.
pub struct LocalStore {
    data: ConcurrentMap<String, String>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self {
            data: ConcurrentMap::new(),
        }
    }

    pub fn with_seed(seed: HashMap<String, String>) -> Self {
        Self {
            data: seed.into_iter().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.data.get(&key.to_string())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.exists(&key.to_string())
    }

    pub fn put(&self, key: String, value: String) {
        self.data.put(key, value);
    }

    pub fn delete(&self, key: &str) {
        self.data.delete(&key.to_string());
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}
