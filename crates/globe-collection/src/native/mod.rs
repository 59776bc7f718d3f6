//! The native collection contract.
//!
//! A [`NativeCollection`] is the engine-side store a
//! [`Collection`](crate::collection::Collection) wraps. Engines expose one of
//! four notification shapes, described by [`NativeEvents`]; the adapter
//! normalizes whichever one it gets into cache invalidation.
//!
//! The submodules provide reference implementations of the four kinds:
//!
//! | kind | type | signals |
//! |------|------|---------|
//! | 1 | [`EntityCollection`] | `collection_changed` |
//! | 2 | [`PrimitiveCollection`] | `added`, `removed` |
//! | 3 | [`DataSourceCollection`] | `added`, `moved`, `removed` |
//! | 4 | [`ImageryLayerCollection`] | `added`, `moved`, `removed`, `shown_or_hidden` |

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::NativeError;
use crate::property::ObjectRef;
use crate::reactive::EventEmitter;

pub mod data_source;
pub mod entity;
pub mod imagery;
mod list;
pub mod primitive;

pub use data_source::DataSourceCollection;
pub use entity::EntityCollection;
pub use imagery::ImageryLayerCollection;
pub use primitive::PrimitiveCollection;

// ============================================================================
// Item
// ============================================================================

/// An engine object managed by a collection.
///
/// Items are cheap shared handles; clones refer to the same engine object.
/// The adapter identifies items by [`key`](Item::key) and never attaches
/// state to them.
pub trait Item: Clone + Send + Sync + 'static {
    type Key: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static;

    fn key(&self) -> Self::Key;

    /// Current visibility, or `None` when the item has no visibility flag.
    fn shown(&self) -> Option<bool> {
        None
    }

    /// Set the visibility flag. Ignored by items without one.
    fn set_shown(&self, _shown: bool) {}

    /// Property object reachable by `set_property`, if any.
    fn properties(&self) -> Option<ObjectRef> {
        None
    }
}

// ============================================================================
// Notification payloads
// ============================================================================

/// Payload of the combined kind-1 signal.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionChange<T> {
    pub added: Vec<T>,
    pub removed: Vec<T>,
}

impl<T> CollectionChange<T> {
    pub fn affects_membership(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// An item together with its position in the native collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Indexed<T> {
    pub item: T,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Moved<T> {
    pub item: T,
    pub new_index: usize,
    pub old_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShownChanged<T> {
    pub item: T,
    pub index: usize,
    pub shown: bool,
}

/// A native notification source.
pub type Signal<E> = Arc<EventEmitter<E>>;

/// The notification surface of one native collection kind.
pub enum NativeEvents<T> {
    /// Kind 1: one signal carrying added and removed batches.
    CollectionChanged(Signal<CollectionChange<T>>),
    /// Kind 2: separate added and removed signals.
    AddedRemoved {
        added: Signal<T>,
        removed: Signal<T>,
    },
    /// Kind 3: added, moved and removed.
    AddedMovedRemoved {
        added: Signal<T>,
        moved: Signal<Moved<T>>,
        removed: Signal<T>,
    },
    /// Kind 4: added, moved, removed and visibility changes.
    Layered {
        added: Signal<Indexed<T>>,
        moved: Signal<Moved<T>>,
        removed: Signal<Indexed<T>>,
        shown_or_hidden: Signal<ShownChanged<T>>,
    },
    /// The collection offers no notifications.
    None,
}

impl<T> NativeEvents<T> {
    /// Short name of the notification shape, for logs.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::CollectionChanged(_) => "collection-changed",
            Self::AddedRemoved { .. } => "added-removed",
            Self::AddedMovedRemoved { .. } => "added-moved-removed",
            Self::Layered { .. } => "layered",
            Self::None => "none",
        }
    }

    /// Number of distinct signals exposed.
    pub fn signal_count(&self) -> usize {
        match self {
            Self::CollectionChanged(_) => 1,
            Self::AddedRemoved { .. } => 2,
            Self::AddedMovedRemoved { .. } => 3,
            Self::Layered { .. } => 4,
            Self::None => 0,
        }
    }
}

// ============================================================================
// NativeCollection
// ============================================================================

/// Engine-side collection wrapped by the adapter.
///
/// All methods take `&self`: native collections are shared with the
/// rendering layer and mutate through interior mutability.
pub trait NativeCollection: Send + Sync {
    type Item: Item;

    /// Insert `item`, at `index` when the kind supports positional insertion.
    fn add(&self, item: Self::Item, index: Option<usize>) -> Result<(), NativeError>;

    /// Remove `item`. Returns `false` if it was not present.
    fn remove(&self, item: &Self::Item) -> bool;

    fn remove_all(&self);

    fn contains(&self, item: &Self::Item) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every item in native iteration order.
    fn values(&self) -> Vec<Self::Item>;

    /// The change notifications this collection exposes.
    fn events(&self) -> NativeEvents<Self::Item> {
        NativeEvents::None
    }
}
