//! Events emitted by a [`Collection`](crate::collection::Collection) to its
//! own observers. These are independent of the native collection's signals.

use crate::types::Tag;

/// Discriminant used to register listeners for one kind of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Add,
    Remove,
    Update,
    Clear,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [Self::Add, Self::Remove, Self::Update, Self::Clear];
}

/// A change made through the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionEvent<T> {
    /// Items were added (in insertion order).
    Add { items: Vec<T> },
    /// Items were removed, singly or by tag.
    Remove { items: Vec<T> },
    /// Items were re-tagged from `from` to `to`.
    Update { items: Vec<T>, from: Tag, to: Tag },
    /// The whole collection was emptied.
    Clear,
}

impl<T> CollectionEvent<T> {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Add { .. } => EventKind::Add,
            Self::Remove { .. } => EventKind::Remove,
            Self::Update { .. } => EventKind::Update,
            Self::Clear => EventKind::Clear,
        }
    }

    /// Items carried by the event. Empty for `Clear`.
    pub fn items(&self) -> &[T] {
        match self {
            Self::Add { items } | Self::Remove { items } | Self::Update { items, .. } => items,
            Self::Clear => &[],
        }
    }
}
