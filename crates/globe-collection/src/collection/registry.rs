//! Keyed registry of collections with explicit release.
//!
//! Hosts that tie a collection's lifetime to some external resource (a
//! viewer, a scene) key it by that resource's handle. Entries are built on
//! first use and destroyed on [`release`](CollectionRegistry::release).

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::debug;

use super::adapter::Collection;
use crate::native::NativeCollection;

pub struct CollectionRegistry<K, N: NativeCollection> {
    entries: HashMap<K, Collection<N>>,
}

impl<K, N> CollectionRegistry<K, N>
where
    K: Eq + Hash + fmt::Debug,
    N: NativeCollection,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The collection for `key`, built with `create` if absent.
    pub fn get_or_create(
        &mut self,
        key: K,
        create: impl FnOnce() -> Collection<N>,
    ) -> &mut Collection<N> {
        self.entries.entry(key).or_insert_with(create)
    }

    pub fn get(&self, key: &K) -> Option<&Collection<N>> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut Collection<N>> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Destroy and forget the collection for `key`.
    pub fn release(&mut self, key: &K) -> bool {
        match self.entries.remove(key) {
            Some(mut collection) => {
                collection.destroy();
                debug!(key = ?key, "released collection");
                true
            }
            None => false,
        }
    }

    /// Destroy every collection. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let n = self.entries.len();
        for (_, mut collection) in self.entries.drain() {
            collection.destroy();
        }
        n
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, N> Default for CollectionRegistry<K, N>
where
    K: Eq + Hash + fmt::Debug,
    N: NativeCollection,
{
    fn default() -> Self {
        Self::new()
    }
}
