//! Kind 2: separate added and removed signals.

use std::sync::Arc;

use super::list::ItemList;
use super::{Item, NativeCollection, NativeEvents, Signal};
use crate::error::NativeError;
use crate::reactive::EventEmitter;

/// Primitive-style collection with positional insertion.
pub struct PrimitiveCollection<T> {
    items: ItemList<T>,
    added: Signal<T>,
    removed: Signal<T>,
}

impl<T: Item> PrimitiveCollection<T> {
    pub fn new() -> Self {
        Self {
            items: ItemList::new(),
            added: Arc::new(EventEmitter::new()),
            removed: Arc::new(EventEmitter::new()),
        }
    }

    pub fn primitive_added(&self) -> &Signal<T> {
        &self.added
    }

    pub fn primitive_removed(&self) -> &Signal<T> {
        &self.removed
    }

    /// Item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.snapshot().get(index).cloned()
    }
}

impl<T: Item> Default for PrimitiveCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> NativeCollection for PrimitiveCollection<T> {
    type Item = T;

    fn add(&self, item: T, index: Option<usize>) -> Result<(), NativeError> {
        self.items.insert(item.clone(), index)?;
        self.added.emit(&item);
        Ok(())
    }

    fn remove(&self, item: &T) -> bool {
        match self.items.remove(item) {
            Some((_, removed)) => {
                self.removed.emit(&removed);
                true
            }
            None => false,
        }
    }

    fn remove_all(&self) {
        for removed in self.items.take_all() {
            self.removed.emit(&removed);
        }
    }

    fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn values(&self) -> Vec<T> {
        self.items.snapshot()
    }

    fn events(&self) -> NativeEvents<T> {
        NativeEvents::AddedRemoved {
            added: Arc::clone(&self.added),
            removed: Arc::clone(&self.removed),
        }
    }
}
