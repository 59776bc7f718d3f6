//! Event bridge: turns any native notification shape into cache invalidation.
//!
//! [`EventBridge::subscribe`] attaches one listener per native signal. Each
//! listener only bumps the shared [`Invalidator`] epoch. The returned
//! [`Subscription`]s undo the attachment when released.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::native::{NativeEvents, Signal};
use crate::reactive::ListenerId;

// ============================================================================
// Invalidator
// ============================================================================

/// Shared invalidation epoch. A cached snapshot is valid only while the epoch
/// it was built at is still current.
#[derive(Debug, Clone, Default)]
pub struct Invalidator {
    epoch: Arc<AtomicU64>,
}

impl Invalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }
}

// ============================================================================
// Subscription
// ============================================================================

/// Reversible attachment to a native signal. Released at most once.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new<E: 'static>(signal: &Signal<E>, id: ListenerId) -> Self {
        let signal = Arc::clone(signal);
        Self {
            release: Some(Box::new(move || {
                signal.off(id);
            })),
        }
    }

    /// Detach from the signal. Returns `false` if already released.
    pub fn release(&mut self) -> bool {
        match self.release.take() {
            Some(release) => {
                release();
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

// ============================================================================
// EventBridge
// ============================================================================

/// Subscribe to every membership-changing notification of a native source.
pub trait EventBridge {
    fn subscribe(&self, invalidator: &Invalidator) -> Vec<Subscription>;
}

fn invalidate_on<E: 'static>(signal: &Signal<E>, invalidator: &Invalidator) -> Subscription {
    let invalidator = invalidator.clone();
    let id = signal.on(move |_: &E| invalidator.invalidate());
    Subscription::new(signal, id)
}

impl<T: 'static> EventBridge for NativeEvents<T> {
    fn subscribe(&self, invalidator: &Invalidator) -> Vec<Subscription> {
        let subscriptions = match self {
            Self::CollectionChanged(changed) => {
                let inv = invalidator.clone();
                let id = changed.on(move |change| {
                    if change.affects_membership() {
                        inv.invalidate();
                    }
                });
                vec![Subscription::new(changed, id)]
            }
            Self::AddedRemoved { added, removed } => vec![
                invalidate_on(added, invalidator),
                invalidate_on(removed, invalidator),
            ],
            Self::AddedMovedRemoved {
                added,
                moved,
                removed,
            } => vec![
                invalidate_on(added, invalidator),
                invalidate_on(moved, invalidator),
                invalidate_on(removed, invalidator),
            ],
            // Visibility does not change membership or order, but the
            // handler is cheap and keeps every signal of the kind covered.
            Self::Layered {
                added,
                moved,
                removed,
                shown_or_hidden,
            } => vec![
                invalidate_on(added, invalidator),
                invalidate_on(moved, invalidator),
                invalidate_on(removed, invalidator),
                invalidate_on(shown_or_hidden, invalidator),
            ],
            Self::None => Vec::new(),
        };

        if subscriptions.is_empty() {
            debug!("native collection exposes no change signals; external mutation will not invalidate the cache");
        } else {
            debug!(
                shape = self.shape(),
                count = subscriptions.len(),
                "subscribed to native change signals"
            );
        }
        subscriptions
    }
}
