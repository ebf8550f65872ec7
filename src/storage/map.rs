//! Coarse-Locked Concurrent Map
//!
//! A `HashMap` behind a single mutex. Every call takes the lock for the
//! whole map and releases it on return, so each operation is atomic on its
//! own but nothing spans two calls. Compound decisions that must be atomic
//! (check-then-insert, take-and-remove) get their own methods instead of
//! being composed from `exists` + `put`.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;

pub struct ConcurrentMap<K, V> {
    inner: Mutex<HashMap<K, V>>,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a clone of the stored value, if any.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    pub fn exists(&self, key: &K) -> bool {
        self.inner.lock().contains_key(key)
    }

    /// Inserts or overwrites. Returns the displaced value.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().insert(key, value)
    }

    /// Removes the entry; a missing key is a no-op.
    pub fn delete(&self, key: &K) {
        self.inner.lock().remove(key);
    }

    /// Inserts only when the key is absent. Returns `true` if this call
    /// inserted.
    pub fn insert_if_absent(&self, key: K, value: V) -> bool {
        let mut map = self.inner.lock();
        if map.contains_key(&key) {
            return false;
        }
        map.insert(key, value);
        true
    }

    /// Removes the entry and hands ownership of the value to the caller.
    pub fn take(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Runs `f` against the entry for `key` while holding the lock.
    ///
    /// `f` receives `None` when the key is absent and may insert, mutate or
    /// clear the slot; the slot is written back (or removed when left `None`)
    /// before the lock is released.
    pub fn update<R>(&self, key: K, f: impl FnOnce(&mut Option<V>) -> R) -> R {
        let mut map = self.inner.lock();
        let mut slot = map.remove(&key);
        let result = f(&mut slot);
        if let Some(value) = slot {
            map.insert(key, value);
        }
        result
    }

    /// Drops every entry for which `keep` returns `false`. Returns how many
    /// were removed.
    pub fn retain(&self, mut keep: impl FnMut(&K, &V) -> bool) -> usize {
        let mut map = self.inner.lock();
        let before = map.len();
        map.retain(|k, v| keep(k, &*v));
        before - map.len()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl<K, V> Default for ConcurrentMap<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for ConcurrentMap<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: Mutex::new(iter.into_iter().collect()),
        }
    }
}
