//! Reactive primitives shared by the native collections and the adapter.
//!
//! - [`event`]: [`CollectionEvent`] and [`EventKind`].
//! - [`event_emitter`]: generic typed pub/sub ([`EventEmitter<T>`]).

pub mod event;
pub mod event_emitter;

pub use event::{CollectionEvent, EventKind};
pub use event_emitter::{EventEmitter, ListenerFn, ListenerId};
