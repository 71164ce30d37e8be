use std::hash::Hash;

use fnv::FnvHashMap;

/// Small keyed store backed by the FNV hasher.
pub struct Map<K, V>(pub FnvHashMap<K, V>);

impl<K: Eq + Hash, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> Map<K, V> {
    pub fn new() -> Self {
        Self(FnvHashMap::<K, V>::default())
    }

    pub fn insert(&mut self, k: K, data: V) -> Option<V> {
        self.0.insert(k, data)
    }

    pub fn get(&self, k: &K) -> Option<&V> {
        self.0.get(k)
    }

    pub fn contains_key(&self, k: &K) -> bool {
        self.0.contains_key(k)
    }

    /// Returns the value stored under `k`, building it with `f` on first access.
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, k: K, f: F) -> &V {
        self.0.entry(k).or_insert_with(f)
    }

    /// Fallible variant of [Map::get_or_insert_with]: nothing is stored when `f` fails.
    pub fn get_or_try_insert_with<E, F: FnOnce() -> Result<V, E>>(&mut self, k: K, f: F) -> Result<&V, E> {
        match self.0.entry(k) {
            std::collections::hash_map::Entry::Occupied(e) => Ok(e.into_mut()),
            std::collections::hash_map::Entry::Vacant(e) => Ok(e.insert(f()?)),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
