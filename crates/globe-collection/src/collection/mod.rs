//! The tagged collection adapter.
//!
//! - [`adapter`]: [`Collection<N>`], with its tag index, value cache and bulk operations.
//! - [`bridge`]: [`EventBridge`], turning native notifications into cache invalidation.
//! - [`registry`]: [`CollectionRegistry`], for keyed collections with release.

pub mod adapter;
pub mod bridge;
pub mod registry;

pub use adapter::{Collection, Values};
pub use bridge::{EventBridge, Invalidator, Subscription};
pub use registry::CollectionRegistry;
