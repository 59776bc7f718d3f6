//! Kind 1: a single combined change signal.

use std::sync::Arc;

use super::list::ItemList;
use super::{CollectionChange, Item, NativeCollection, NativeEvents, Signal};
use crate::error::NativeError;
use crate::reactive::EventEmitter;

/// Entity-style collection. Appends only and reports every membership change
/// through one `collection_changed` signal.
pub struct EntityCollection<T> {
    items: ItemList<T>,
    collection_changed: Signal<CollectionChange<T>>,
}

impl<T: Item> EntityCollection<T> {
    pub fn new() -> Self {
        Self {
            items: ItemList::new(),
            collection_changed: Arc::new(EventEmitter::new()),
        }
    }

    pub fn collection_changed(&self) -> &Signal<CollectionChange<T>> {
        &self.collection_changed
    }

    fn notify(&self, added: Vec<T>, removed: Vec<T>) {
        let change = CollectionChange { added, removed };
        if change.affects_membership() {
            self.collection_changed.emit(&change);
        }
    }
}

impl<T: Item> Default for EntityCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> NativeCollection for EntityCollection<T> {
    type Item = T;

    fn add(&self, item: T, _index: Option<usize>) -> Result<(), NativeError> {
        self.items.insert(item.clone(), None)?;
        self.notify(vec![item], Vec::new());
        Ok(())
    }

    fn remove(&self, item: &T) -> bool {
        match self.items.remove(item) {
            Some((_, removed)) => {
                self.notify(Vec::new(), vec![removed]);
                true
            }
            None => false,
        }
    }

    fn remove_all(&self) {
        let removed = self.items.take_all();
        self.notify(Vec::new(), removed);
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
        NativeEvents::CollectionChanged(Arc::clone(&self.collection_changed))
    }
}
