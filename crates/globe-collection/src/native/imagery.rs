//! Kind 4: added, moved, removed and shown-or-hidden signals.

use std::sync::Arc;

use super::list::{ItemList, Shift};
use super::{Indexed, Item, Moved, NativeCollection, NativeEvents, ShownChanged, Signal};
use crate::error::NativeError;
use crate::reactive::EventEmitter;

/// Layer-style collection with positional insertion, reordering and a
/// visibility signal.
pub struct ImageryLayerCollection<T> {
    items: ItemList<T>,
    added: Signal<Indexed<T>>,
    moved: Signal<Moved<T>>,
    removed: Signal<Indexed<T>>,
    shown_or_hidden: Signal<ShownChanged<T>>,
}

impl<T: Item> ImageryLayerCollection<T> {
    pub fn new() -> Self {
        Self {
            items: ItemList::new(),
            added: Arc::new(EventEmitter::new()),
            moved: Arc::new(EventEmitter::new()),
            removed: Arc::new(EventEmitter::new()),
            shown_or_hidden: Arc::new(EventEmitter::new()),
        }
    }

    pub fn layer_added(&self) -> &Signal<Indexed<T>> {
        &self.added
    }

    pub fn layer_moved(&self) -> &Signal<Moved<T>> {
        &self.moved
    }

    pub fn layer_removed(&self) -> &Signal<Indexed<T>> {
        &self.removed
    }

    pub fn layer_shown_or_hidden(&self) -> &Signal<ShownChanged<T>> {
        &self.shown_or_hidden
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

    /// Set a layer's visibility and announce it. Returns `false` when the
    /// layer is not in this collection or has no visibility flag.
    pub fn set_shown(&self, item: &T, shown: bool) -> bool {
        let Some(index) = self.items.position(item) else {
            return false;
        };
        if item.shown().is_none() {
            return false;
        }
        item.set_shown(shown);
        self.shown_or_hidden.emit(&ShownChanged {
            item: item.clone(),
            index,
            shown,
        });
        true
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

impl<T: Item> Default for ImageryLayerCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> NativeCollection for ImageryLayerCollection<T> {
    type Item = T;

    fn add(&self, item: T, index: Option<usize>) -> Result<(), NativeError> {
        let index = self.items.insert(item.clone(), index)?;
        self.added.emit(&Indexed { item, index });
        Ok(())
    }

    fn remove(&self, item: &T) -> bool {
        match self.items.remove(item) {
            Some((index, removed)) => {
                self.removed.emit(&Indexed {
                    item: removed,
                    index,
                });
                true
            }
            None => false,
        }
    }

    fn remove_all(&self) {
        // Announce from the top down so each reported index is still valid.
        let removed = self.items.take_all();
        for (index, item) in removed.into_iter().enumerate().rev() {
            self.removed.emit(&Indexed { item, index });
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
        NativeEvents::Layered {
            added: Arc::clone(&self.added),
            moved: Arc::clone(&self.moved),
            removed: Arc::clone(&self.removed),
            shown_or_hidden: Arc::clone(&self.shown_or_hidden),
        }
    }
}
