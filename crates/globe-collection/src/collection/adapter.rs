//! Collection<N>: tagged, cached, observable adapter over a native
//! collection.
//!
//! # State
//!
//! - `native`: the wrapped engine collection, shared with the renderer.
//! - `tag_index`: tag → insertion-ordered items, in first-use tag order.
//! - `item_tags`: item key → current tag. An item is in `tag_index[t]` iff
//!   `item_tags[key] == t`; every mutator keeps both sides in step.
//! - `cache`: snapshot of `native.values()` stamped with the invalidation
//!   epoch it was built at. Local mutators and the native event bridge bump
//!   the epoch, so a stale snapshot is never returned.
//!
//! # Threading model
//!
//! Mutators take `&mut self`; the adapter is the only writer of its index.
//! The cache sits behind a `parking_lot::Mutex` so `values()` works through
//! `&self`, and the epoch is atomic because native signals may fire from any
//! thread that mutates the shared native collection.
//!
//! # After `destroy()`
//!
//! Mutators are no-ops that log a warning and return their empty result;
//! reads behave as on an empty collection.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, trace, warn};

use super::bridge::{EventBridge, Invalidator, Subscription};
use crate::error::{NativeError, PropertyError, Result};
use crate::native::{Item, NativeCollection};
use crate::property::set_path;
use crate::reactive::{CollectionEvent, EventEmitter, EventKind, ListenerId};
use crate::types::{AddOptions, CollectionOptions, SetPropertyReport, Tag};

type KeyOf<T> = <T as Item>::Key;

// ============================================================================
// Internal state
// ============================================================================

struct CachedValues<T> {
    epoch: u64,
    values: Arc<[T]>,
}

/// One emitter per [`EventKind`].
struct Listeners<T> {
    add: EventEmitter<CollectionEvent<T>>,
    remove: EventEmitter<CollectionEvent<T>>,
    update: EventEmitter<CollectionEvent<T>>,
    clear: EventEmitter<CollectionEvent<T>>,
}

impl<T> Listeners<T> {
    fn new() -> Self {
        Self {
            add: EventEmitter::new(),
            remove: EventEmitter::new(),
            update: EventEmitter::new(),
            clear: EventEmitter::new(),
        }
    }

    fn get(&self, kind: EventKind) -> &EventEmitter<CollectionEvent<T>> {
        match kind {
            EventKind::Add => &self.add,
            EventKind::Remove => &self.remove,
            EventKind::Update => &self.update,
            EventKind::Clear => &self.clear,
        }
    }
}

// ============================================================================
// Collection
// ============================================================================

/// Tag-indexed adapter over a [`NativeCollection`].
pub struct Collection<N: NativeCollection> {
    native: Arc<N>,
    default_tag: Tag,
    tag_index: IndexMap<Tag, IndexMap<KeyOf<N::Item>, N::Item>>,
    item_tags: HashMap<KeyOf<N::Item>, Tag>,
    cache: Mutex<Option<CachedValues<N::Item>>>,
    invalidator: Invalidator,
    listeners: Listeners<N::Item>,
    subscriptions: Vec<Subscription>,
    destroyed: bool,
}

impl<N: NativeCollection> Collection<N> {
    /// Wrap `native` with default options.
    pub fn new(native: Arc<N>) -> Self {
        Self::with_options(native, CollectionOptions::default())
    }

    pub fn with_options(native: Arc<N>, options: CollectionOptions) -> Self {
        let mut collection = Self {
            native,
            default_tag: options.default_tag,
            tag_index: IndexMap::new(),
            item_tags: HashMap::new(),
            cache: Mutex::new(None),
            invalidator: Invalidator::new(),
            listeners: Listeners::new(),
            subscriptions: Vec::new(),
            destroyed: false,
        };
        if options.bridge_native_events {
            collection.subscriptions = collection.native.events().subscribe(&collection.invalidator);
        }
        collection
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The wrapped native collection.
    pub fn native(&self) -> &Arc<N> {
        &self.native
    }

    pub fn default_tag(&self) -> &Tag {
        &self.default_tag
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Number of items in the native collection.
    pub fn len(&self) -> usize {
        if self.destroyed {
            return 0;
        }
        self.native.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every item in native order.
    ///
    /// Rebuilt from the native collection at most once per invalidation;
    /// repeated reads return the same shared snapshot.
    pub fn values(&self) -> Arc<[N::Item]> {
        if self.destroyed {
            return Arc::from(Vec::new());
        }
        let mut cache = self.cache.lock();
        let epoch = self.invalidator.epoch();
        if let Some(cached) = cache.as_ref() {
            if cached.epoch == epoch {
                return Arc::clone(&cached.values);
            }
        }
        let values: Arc<[N::Item]> = self.native.values().into();
        trace!(count = values.len(), epoch, "rebuilt collection values cache");
        *cache = Some(CachedValues {
            epoch,
            values: Arc::clone(&values),
        });
        values
    }

    /// Iterate over [`values`](Self::values).
    pub fn iter(&self) -> Values<N::Item> {
        Values {
            values: self.values(),
            next: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Add one item. Returns the native item count afterwards.
    pub fn add(&mut self, item: N::Item, options: &AddOptions) -> Result<usize> {
        self.add_many([item], options)
    }

    /// Add items in order under one tag.
    ///
    /// An item this adapter already manages is not added again: it moves to
    /// the new tag and is announced in an `Update` event per former tag.
    ///
    /// Not atomic: if the native collection rejects an item, the items before
    /// it stay added (and are announced), and the native error is returned.
    pub fn add_many(
        &mut self,
        items: impl IntoIterator<Item = N::Item>,
        options: &AddOptions,
    ) -> Result<usize> {
        if self.is_gone("add") {
            return Ok(0);
        }
        let tag = options
            .tag
            .clone()
            .unwrap_or_else(|| self.default_tag.clone());

        let mut added = Vec::new();
        let mut retagged: IndexMap<Tag, Vec<N::Item>> = IndexMap::new();
        let mut failure: Option<NativeError> = None;
        for item in items {
            if let Some(previous) = self.managed_tag(&item) {
                if previous != tag {
                    self.index_item(item.clone(), &tag);
                    retagged.entry(previous).or_default().push(item);
                }
                continue;
            }
            // Saturating: append-only kinds accept any index.
            let index = options.index.map(|i| i.saturating_add(added.len()));
            if let Err(e) = self.native.add(item.clone(), index) {
                failure = Some(e);
                break;
            }
            self.invalidator.invalidate();
            self.index_item(item.clone(), &tag);
            added.push(item);
        }

        if !added.is_empty() {
            debug!(tag = %tag, count = added.len(), "added items");
            self.emit(CollectionEvent::Add { items: added });
        }
        for (from, items) in retagged {
            debug!(from = %from, to = %tag, count = items.len(), "re-tagged items on add");
            self.emit(CollectionEvent::Update {
                items,
                from,
                to: tag.clone(),
            });
        }
        if let Some(e) = failure {
            return Err(e.into());
        }
        Ok(self.native.len())
    }

    /// Remove one item. Returns whether it was present natively or in the
    /// tag index. The `Remove` event is only emitted when the native
    /// collection still held the item.
    pub fn remove(&mut self, item: &N::Item) -> bool {
        if self.is_gone("remove") {
            return false;
        }
        let removed = self.native.remove(item);
        let unindexed = self.unindex(&item.key()).is_some();
        if removed {
            self.invalidator.invalidate();
            self.emit(CollectionEvent::Remove {
                items: vec![item.clone()],
            });
        }
        removed || unindexed
    }

    /// Remove every item carrying `tag`.
    pub fn remove_by_tag(&mut self, tag: impl Into<Tag>) -> bool {
        let tag: Tag = tag.into();
        self.remove_by_tags([tag])
    }

    /// Remove every item carrying any of `tags`, invalidating once.
    ///
    /// Returns whether any tag had members. Members already removed from the
    /// native collection by other code are dropped from the index but left
    /// out of the `Remove` event.
    pub fn remove_by_tags(&mut self, tags: impl IntoIterator<Item = impl Into<Tag>>) -> bool {
        if self.is_gone("remove_by_tags") {
            return false;
        }
        let mut removed = Vec::new();
        let mut unindexed = 0;
        for tag in tags {
            let tag = tag.into();
            let Some(members) = self.tag_index.shift_remove(&tag) else {
                continue;
            };
            for (key, item) in members {
                self.item_tags.remove(&key);
                unindexed += 1;
                if self.native.remove(&item) {
                    removed.push(item);
                }
            }
            trace!(tag = %tag, "removed tag");
        }
        if !removed.is_empty() {
            self.invalidator.invalidate();
            debug!(
                count = removed.len(),
                stale = unindexed - removed.len(),
                "removed items by tag"
            );
            self.emit(CollectionEvent::Remove { items: removed });
        }
        unindexed > 0
    }

    /// Empty the native collection and the tag index.
    pub fn remove_all(&mut self) {
        if self.is_gone("remove_all") {
            return;
        }
        self.native.remove_all();
        self.tag_index.clear();
        self.item_tags.clear();
        self.invalidator.invalidate();
        debug!("removed all items");
        self.emit(CollectionEvent::Clear);
    }

    /// Move every item from `from` to `to`. Returns the number moved.
    ///
    /// Membership of the native collection is unchanged, so the value cache
    /// stays valid.
    pub fn update(&mut self, from: impl Into<Tag>, to: impl Into<Tag>) -> usize {
        if self.is_gone("update") {
            return 0;
        }
        let (from, to) = (from.into(), to.into());
        if from == to {
            return 0;
        }
        let Some(members) = self.tag_index.shift_remove(&from) else {
            return 0;
        };

        let dest = self.tag_index.entry(to.clone()).or_default();
        let mut moved = Vec::with_capacity(members.len());
        for (key, item) in members {
            self.item_tags.insert(key.clone(), to.clone());
            dest.insert(key, item.clone());
            moved.push(item);
        }

        let count = moved.len();
        debug!(from = %from, to = %to, count, "re-tagged items");
        self.emit(CollectionEvent::Update {
            items: moved,
            from,
            to,
        });
        count
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Items carrying `tag`, in insertion order.
    pub fn get(&self, tag: impl Into<Tag>) -> Vec<N::Item> {
        self.tag_index
            .get(&tag.into())
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    /// First item added under `tag`.
    pub fn first(&self, tag: impl Into<Tag>) -> Option<N::Item> {
        self.tag_index
            .get(&tag.into())
            .and_then(|members| members.first())
            .map(|(_, item)| item.clone())
    }

    /// Whether the native collection holds `item`.
    pub fn contains(&self, item: &N::Item) -> bool {
        !self.destroyed && self.native.contains(item)
    }

    /// Whether any item carries `tag`.
    pub fn contains_tag(&self, tag: impl Into<Tag>) -> bool {
        self.tag_index
            .get(&tag.into())
            .is_some_and(|members| !members.is_empty())
    }

    /// Tag currently attached to `item`.
    pub fn tag_of(&self, item: &N::Item) -> Option<&Tag> {
        self.item_tags.get(&item.key())
    }

    /// Tags with at least one item, in first-use order.
    pub fn tags(&self) -> Vec<Tag> {
        self.tag_index.keys().cloned().collect()
    }

    // -----------------------------------------------------------------------
    // Bulk query
    // -----------------------------------------------------------------------

    pub fn filter(
        &self,
        mut predicate: impl FnMut(&N::Item) -> bool,
        tag: Option<Tag>,
    ) -> Vec<N::Item> {
        self.scope(tag)
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    /// Apply `f(item, index)`; `index` counts within the (narrowed) iteration.
    pub fn map<R>(&self, mut f: impl FnMut(&N::Item, usize) -> R, tag: Option<Tag>) -> Vec<R> {
        self.scope(tag)
            .iter()
            .enumerate()
            .map(|(i, item)| f(item, i))
            .collect()
    }

    pub fn find(
        &self,
        mut predicate: impl FnMut(&N::Item) -> bool,
        tag: Option<Tag>,
    ) -> Option<N::Item> {
        self.scope(tag).iter().find(|item| predicate(item)).cloned()
    }

    pub fn for_each(&self, mut f: impl FnMut(&N::Item, usize), tag: Option<Tag>) {
        for (i, item) in self.scope(tag).iter().enumerate() {
            f(item, i);
        }
    }

    // -----------------------------------------------------------------------
    // Visibility and properties
    // -----------------------------------------------------------------------

    /// Show every item of `tag` that has a visibility flag. Returns how many.
    pub fn show(&self, tag: impl Into<Tag>) -> usize {
        self.apply_visibility(tag.into(), |_| true)
    }

    pub fn hide(&self, tag: impl Into<Tag>) -> usize {
        self.apply_visibility(tag.into(), |_| false)
    }

    pub fn toggle(&self, tag: impl Into<Tag>) -> usize {
        self.apply_visibility(tag.into(), |shown| !shown)
    }

    /// Write `value` at the dotted `path` of every item's property object,
    /// optionally narrowed to `tag`.
    ///
    /// Unsafe paths and paths that do not resolve are counted per item and
    /// do not stop the batch. A read-only or method property is an error;
    /// items processed before it keep their new value.
    pub fn set_property(
        &self,
        path: &str,
        value: Value,
        tag: Option<Tag>,
    ) -> Result<SetPropertyReport> {
        let mut report = SetPropertyReport::default();
        for item in self.scope(tag).iter() {
            let Some(properties) = item.properties() else {
                report.skipped += 1;
                continue;
            };
            match set_path(&properties, path, value.clone()) {
                Ok(()) => report.applied += 1,
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(PropertyError::UnsafePath { .. }) => report.rejected += 1,
                Err(_) => report.skipped += 1,
            }
        }
        if report.rejected > 0 {
            warn!(path, rejected = report.rejected, "refused unsafe property path");
        }
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// Register `callback` for events of `kind`.
    pub fn on(
        &self,
        kind: EventKind,
        callback: impl Fn(&CollectionEvent<N::Item>) + Send + Sync + 'static,
    ) -> ListenerId {
        self.listeners.get(kind).on(callback)
    }

    /// Remove a listener. Returns `false` if it was not registered for `kind`.
    pub fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        self.listeners.get(kind).off(id)
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(kind).size()
    }

    // -----------------------------------------------------------------------
    // Teardown
    // -----------------------------------------------------------------------

    /// Release native subscriptions, clear index, cache and listeners.
    /// Safe to call repeatedly; also runs on drop.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        let released = self
            .subscriptions
            .iter_mut()
            .filter(|sub| sub.is_active())
            .map(Subscription::release)
            .filter(|released| *released)
            .count();
        self.subscriptions.clear();
        self.tag_index.clear();
        self.item_tags.clear();
        *self.cache.get_mut() = None;
        self.invalidator.invalidate();
        for kind in EventKind::ALL {
            self.listeners.get(kind).clear();
        }
        debug!(released, "collection destroyed");
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn is_gone(&self, op: &'static str) -> bool {
        if self.destroyed {
            warn!(op, "mutation on a destroyed collection ignored");
        }
        self.destroyed
    }

    /// Current tag of `item` when this adapter manages it and the native
    /// collection still holds it.
    fn managed_tag(&self, item: &N::Item) -> Option<Tag> {
        let tag = self.item_tags.get(&item.key())?;
        self.native.contains(item).then(|| tag.clone())
    }

    /// Record `item` under `tag`, moving it out of any previous tag.
    fn index_item(&mut self, item: N::Item, tag: &Tag) {
        let key = item.key();
        self.unindex(&key);
        self.item_tags.insert(key.clone(), tag.clone());
        self.tag_index
            .entry(tag.clone())
            .or_default()
            .insert(key, item);
    }

    /// Drop `key` from the marker table and its tag set. Empty tag sets are
    /// removed so `tags()` only lists live tags.
    fn unindex(&mut self, key: &KeyOf<N::Item>) -> Option<N::Item> {
        let tag = self.item_tags.remove(key)?;
        let members = self.tag_index.get_mut(&tag)?;
        let item = members.shift_remove(key);
        if members.is_empty() {
            self.tag_index.shift_remove(&tag);
        }
        item
    }

    fn scope(&self, tag: Option<Tag>) -> Arc<[N::Item]> {
        match tag {
            Some(tag) => self.get(tag).into(),
            None => self.values(),
        }
    }

    fn apply_visibility(&self, tag: Tag, next: impl Fn(bool) -> bool) -> usize {
        let mut affected = 0;
        if let Some(members) = self.tag_index.get(&tag) {
            for item in members.values() {
                if let Some(shown) = item.shown() {
                    item.set_shown(next(shown));
                    affected += 1;
                }
            }
        }
        affected
    }

    /// Deliver `event` to its listeners. A panicking listener is logged and
    /// cannot undo the mutation that has already happened.
    fn emit(&self, event: CollectionEvent<N::Item>) {
        let emitter = self.listeners.get(event.kind());
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            emitter.emit(&event);
        }));
        if outcome.is_err() {
            warn!(kind = ?event.kind(), "collection event listener panicked");
        }
    }
}

impl<N: NativeCollection> Drop for Collection<N> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<N: NativeCollection> std::fmt::Debug for Collection<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("default_tag", &self.default_tag)
            .field("tags", &self.tag_index.len())
            .field("indexed", &self.item_tags.len())
            .field("subscriptions", &self.subscriptions.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

// ============================================================================
// Iteration
// ============================================================================

/// Iterator over a cached values snapshot.
pub struct Values<T> {
    values: Arc<[T]>,
    next: usize,
}

impl<T: Clone> Iterator for Values<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.values.get(self.next)?.clone();
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.values.len() - self.next;
        (rest, Some(rest))
    }
}

impl<T: Clone> ExactSizeIterator for Values<T> {}

impl<'a, N: NativeCollection> IntoIterator for &'a Collection<N> {
    type Item = N::Item;
    type IntoIter = Values<N::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
