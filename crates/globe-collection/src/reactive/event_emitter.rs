//! EventEmitter<T>: typed synchronous pub/sub.
//!
//! Used in two places: native collections expose their change notifications
//! as emitters, and the collection adapter keeps one emitter per event kind
//! for its own observers.
//!
//! Emission works on a snapshot of the listener list:
//!   - a listener removed *during* emission is still called in that round;
//!   - a listener added *during* emission waits for the next emit.
//!
//! All methods take `&self`. The internal `parking_lot::Mutex` is never held
//! while a callback runs, so callbacks may call `on()`/`off()` freely.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Handle returned by [`EventEmitter::on`], accepted by [`EventEmitter::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Closure type for event listeners.
pub type ListenerFn<T> = dyn Fn(&T) + Send + Sync;

/// Typed synchronous event emitter.
pub struct EventEmitter<T> {
    listeners: Mutex<Vec<(ListenerId, Arc<ListenerFn<T>>)>>,
    next_id: AtomicU64,
}

impl<T> EventEmitter<T> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register `callback`; it runs on every subsequent [`emit`](Self::emit).
    pub fn on(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(callback)));
        id
    }

    /// Remove the listener identified by `id`.
    ///
    /// Returns `false` when `id` is unknown, so double removal is harmless.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Call every registered listener with `event`, in registration order.
    ///
    /// Returns the number of listeners called.
    pub fn emit(&self, event: &T) -> usize {
        let snapshot: Vec<Arc<ListenerFn<T>>> = {
            let guard = self.listeners.lock();
            guard.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for cb in &snapshot {
            cb(event);
        }
        snapshot.len()
    }

    /// Drop every listener. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut listeners = self.listeners.lock();
        let n = listeners.len();
        listeners.clear();
        n
    }

    /// Number of currently registered listeners.
    pub fn size(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.size())
            .finish()
    }
}
