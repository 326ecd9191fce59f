//! The contract a concurrent bounded cache exposes to its callers.

use super::metrics::CacheMetrics;
use crate::error::{Error, Result};

/// A concurrent key/value cache.
///
/// All methods take `&self`: implementations are expected to be shared
/// between threads. Values are returned by clone, so `V` is typically an
/// `Arc` or a small `Copy` type.
///
/// Implementors provide the primitive operations; the compound ones
/// (`get`, `get_or_add`, `add_or_update`, ...) are built on top of them here
/// and inherit their races and guarantees.
pub trait Cache<K: Clone, V: Clone> {
    /// Iterator over `(key, value)` pairs.
    ///
    /// Need not be a point-in-time snapshot: entries changed while iterating
    /// may or may not be observed.
    type Iter<'a>: Iterator<Item = (K, V)>
    where
        Self: 'a;

    /// Number of entries currently stored.
    fn count(&self) -> usize;

    /// Maximum number of entries retained.
    fn capacity(&self) -> usize;

    /// Returns the cache's statistics.
    fn metrics(&self) -> &dyn CacheMetrics;

    /// Iterates over the entries.
    fn iter(&self) -> Self::Iter<'_>;

    /// Inserts `key` only if it is absent. Returns whether it was inserted.
    fn try_add(&self, key: K, value: V) -> bool;

    /// Looks `key` up, recording a hit or a miss.
    fn try_get(&self, key: &K) -> Option<V>;

    /// Removes `key`, returning its value if it was present.
    fn try_remove(&self, key: &K) -> Option<V>;

    /// Removes `key` only if its current value satisfies `predicate`.
    fn try_remove_if<F>(&self, key: &K, predicate: F) -> bool
    where
        F: FnOnce(&V) -> bool;

    /// Replaces the value of an existing `key`. Returns `false` if absent.
    fn try_update(&self, key: &K, value: V) -> bool;

    /// Removes every entry.
    fn clear(&self);

    /// Keys currently stored.
    fn keys(&self) -> Vec<K> {
        self.iter().map(|(key, _)| key).collect()
    }

    /// Looks `key` up.
    ///
    /// # Errors
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    fn get(&self, key: &K) -> Result<V> {
        self.try_get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the cached value for `key`, producing and inserting one with
    /// `factory` if absent.
    ///
    /// The factory may run concurrently on several threads for the same key;
    /// the first insert wins and every caller returns either its own value or
    /// the winner's, never a mix.
    fn get_or_add<F>(&self, key: K, factory: F) -> V
    where
        F: Fn(&K) -> V,
    {
        loop {
            if let Some(value) = self.try_get(&key) {
                return value;
            }
            let value = factory(&key);
            if self.try_add(key.clone(), value.clone()) {
                return value;
            }
        }
    }

    /// Like [`get_or_add`](Self::get_or_add), passing `arg` through to the
    /// factory so callers can avoid capturing state in a closure.
    fn get_or_add_with<A, F>(&self, key: K, factory: F, arg: A) -> V
    where
        F: Fn(&K, &A) -> V,
    {
        loop {
            if let Some(value) = self.try_get(&key) {
                return value;
            }
            let value = factory(&key, &arg);
            if self.try_add(key.clone(), value.clone()) {
                return value;
            }
        }
    }

    /// Removes `key` only if it currently maps to `value`.
    fn try_remove_entry(&self, key: &K, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.try_remove_if(key, |current| current == value)
    }

    /// Updates `key` if present, otherwise inserts it.
    fn add_or_update(&self, key: K, value: V) {
        loop {
            if self.try_update(&key, value.clone()) {
                return;
            }
            if self.try_add(key.clone(), value.clone()) {
                return;
            }
        }
    }
}
