//! Self-populating map that computes each value on first lookup.

use std::borrow::Borrow;
use std::collections::hash_map::{Entry, HashMap};
use std::fmt;
use std::hash::Hash;

/// Map that fills itself on demand by calling a generator with the missing key.
///
/// Any extra arguments the generator needs are captured by the closure. A
/// successful result is cached and returned on every later lookup without
/// calling the generator again. A failed call caches nothing, so the next
/// lookup of the same key retries.
///
/// Lookups take `&mut self`; sharing one map between threads requires
/// external synchronization.
pub struct LazyMap<K, V, F> {
    entries: HashMap<K, V>,
    generator: F,
}

impl<K, V, F> LazyMap<K, V, F>
where
    K: Eq + Hash,
{
    /// Creates an empty map bound to `generator`.
    pub fn new(generator: F) -> Self {
        Self {
            entries: HashMap::new(),
            generator,
        }
    }

    /// Returns the value for `key`, computing and caching it on a miss.
    pub fn get<E>(&mut self, key: K) -> Result<&V, E>
    where
        F: FnMut(&K) -> Result<V, E>,
    {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let value = (self.generator)(entry.key())?;
                Ok(entry.insert(value))
            }
        }
    }

    /// Returns the cached value for `key` without invoking the generator.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(key)
    }

    /// Returns `true` when a value for `key` has already been cached.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Stores `value` under `key`, bypassing the generator.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// Evicts `key`; the next lookup recomputes it.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.remove(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over cached entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Iterates over cached keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Drops every cached entry while keeping the generator.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Consumes the map and returns the cached entries.
    pub fn into_map(self) -> HashMap<K, V> {
        self.entries
    }
}

impl<K, V, F> fmt::Debug for LazyMap<K, V, F>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyMap")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}
