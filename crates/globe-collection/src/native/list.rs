//! Ordered, key-unique item storage shared by the reference native kinds.
//!
//! Every method takes the lock for its own duration only, so callers can
//! fire signals after a call returns without holding it.

use parking_lot::RwLock;

use super::Item;
use crate::error::NativeError;

/// Where [`ItemList::relocate`] moves an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shift {
    /// One position toward the end.
    Raise,
    /// One position toward the start.
    Lower,
    ToTop,
    ToBottom,
}

pub(crate) struct ItemList<T> {
    items: RwLock<Vec<T>>,
}

impl<T: Item> ItemList<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    /// Insert at `index` (append when `None`). Returns the final index.
    pub fn insert(&self, item: T, index: Option<usize>) -> Result<usize, NativeError> {
        let mut items = self.items.write();
        let key = item.key();
        if items.iter().any(|i| i.key() == key) {
            return Err(NativeError::rejected(format!(
                "item {key:?} is already in the collection"
            )));
        }
        let index = match index {
            Some(i) if i > items.len() => {
                return Err(NativeError::rejected(format!(
                    "index {i} is out of range 0..={}",
                    items.len()
                )))
            }
            Some(i) => i,
            None => items.len(),
        };
        items.insert(index, item);
        Ok(index)
    }

    /// Remove `item`, returning the stored handle and its former index.
    pub fn remove(&self, item: &T) -> Option<(usize, T)> {
        let mut items = self.items.write();
        let key = item.key();
        let index = items.iter().position(|i| i.key() == key)?;
        Some((index, items.remove(index)))
    }

    pub fn take_all(&self) -> Vec<T> {
        std::mem::take(&mut *self.items.write())
    }

    pub fn position(&self, item: &T) -> Option<usize> {
        let key = item.key();
        self.items.read().iter().position(|i| i.key() == key)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.position(item).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.items.read().clone()
    }

    /// Move `item` according to `shift`. Returns `(old, new)` indices, or
    /// `None` when the item is absent or already at the boundary.
    pub fn relocate(&self, item: &T, shift: Shift) -> Option<(usize, usize)> {
        let mut items = self.items.write();
        let key = item.key();
        let old = items.iter().position(|i| i.key() == key)?;
        let last = items.len() - 1;
        let new = match shift {
            Shift::Raise => (old < last).then_some(old + 1)?,
            Shift::Lower => old.checked_sub(1)?,
            Shift::ToTop => (old < last).then_some(last)?,
            Shift::ToBottom => (old > 0).then_some(0)?,
        };
        let moved = items.remove(old);
        items.insert(new, moved);
        Some((old, new))
    }
}
