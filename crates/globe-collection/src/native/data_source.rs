//! Kind 3: added, moved and removed signals.

use std::sync::Arc;

use super::list::{ItemList, Shift};
use super::{Item, Moved, NativeCollection, NativeEvents, Signal};
use crate::error::NativeError;
use crate::reactive::EventEmitter;

/// Data-source-style collection. Appends only; supports reordering.
pub struct DataSourceCollection<T> {
    items: ItemList<T>,
    added: Signal<T>,
    moved: Signal<Moved<T>>,
    removed: Signal<T>,
}

impl<T: Item> DataSourceCollection<T> {
    pub fn new() -> Self {
        Self {
            items: ItemList::new(),
            added: Arc::new(EventEmitter::new()),
            moved: Arc::new(EventEmitter::new()),
            removed: Arc::new(EventEmitter::new()),
        }
    }

    pub fn data_source_added(&self) -> &Signal<T> {
        &self.added
    }

    pub fn data_source_moved(&self) -> &Signal<Moved<T>> {
        &self.moved
    }

    pub fn data_source_removed(&self) -> &Signal<T> {
        &self.removed
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.position(item)
    }

    pub fn raise(&self, item: &T) -> bool {
        self.shift(item, Shift::Raise)
    }

    pub fn lower(&self, item: &T) -> bool {
        self.shift(item, Shift::Lower)
    }

    pub fn raise_to_top(&self, item: &T) -> bool {
        self.shift(item, Shift::ToTop)
    }

    pub fn lower_to_bottom(&self, item: &T) -> bool {
        self.shift(item, Shift::ToBottom)
    }

    fn shift(&self, item: &T, shift: Shift) -> bool {
        match self.items.relocate(item, shift) {
            Some((old_index, new_index)) => {
                self.moved.emit(&Moved {
                    item: item.clone(),
                    new_index,
                    old_index,
                });
                true
            }
            None => false,
        }
    }
}

impl<T: Item> Default for DataSourceCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> NativeCollection for DataSourceCollection<T> {
    type Item = T;

    fn add(&self, item: T, _index: Option<usize>) -> Result<(), NativeError> {
        self.items.insert(item.clone(), None)?;
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
        NativeEvents::AddedMovedRemoved {
            added: Arc::clone(&self.added),
            moved: Arc::clone(&self.moved),
            removed: Arc::clone(&self.removed),
        }
    }
}
