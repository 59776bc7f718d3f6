//! Value cache coherence: local mutation, external mutation through each
//! native kind, and rebuild counting.

use std::sync::Arc;

use globe_collection::collection::Collection;
use globe_collection::native::{
    DataSourceCollection, EntityCollection, ImageryLayerCollection, Item, NativeCollection,
    PrimitiveCollection,
};
use globe_collection::types::{AddOptions, CollectionOptions};

use super::support::{ids, things, CountingNative, SilentNative, Thing};

fn counting() -> (Arc<CountingNative>, Collection<CountingNative>) {
    let native = Arc::new(CountingNative::new());
    let c = Collection::new(Arc::clone(&native));
    (native, c)
}

/// Add two items through the adapter, then mutate the native collection
/// directly and check `values()` follows.
fn assert_external_mutation_visible<N>(native: Arc<N>)
where
    N: NativeCollection<Item = Thing>,
{
    let mut c = Collection::new(Arc::clone(&native));
    c.add_many(things("own", 2), &AddOptions::default()).unwrap();
    assert_eq!(ids(&c.values()), vec!["own0", "own1"]);

    native.add(Thing::new("ext"), None).unwrap();
    assert_eq!(ids(&c.values()), vec!["own0", "own1", "ext"]);

    assert!(native.remove(&Thing::new("own0")));
    assert_eq!(ids(&c.values()), vec!["own1", "ext"]);

    native.remove_all();
    assert!(c.values().is_empty());
}

// ============================================================================
// External mutation per native kind
// ============================================================================

#[test]
fn entity_kind_external_mutation_invalidates() {
    assert_external_mutation_visible(Arc::new(EntityCollection::<Thing>::new()));
}

#[test]
fn primitive_kind_external_mutation_invalidates() {
    assert_external_mutation_visible(Arc::new(PrimitiveCollection::<Thing>::new()));
}

#[test]
fn data_source_kind_external_mutation_invalidates() {
    assert_external_mutation_visible(Arc::new(DataSourceCollection::<Thing>::new()));
}

#[test]
fn imagery_kind_external_mutation_invalidates() {
    assert_external_mutation_visible(Arc::new(ImageryLayerCollection::<Thing>::new()));
}

#[test]
fn data_source_moves_reorder_values() {
    let native = Arc::new(DataSourceCollection::<Thing>::new());
    let mut c = Collection::new(Arc::clone(&native));
    let items = things("d", 3);
    c.add_many(items.clone(), &AddOptions::default()).unwrap();
    assert_eq!(ids(&c.values()), vec!["d0", "d1", "d2"]);

    assert!(native.raise(&items[0]));
    assert_eq!(ids(&c.values()), vec!["d1", "d0", "d2"]);

    assert!(native.lower_to_bottom(&items[2]));
    assert_eq!(ids(&c.values()), vec!["d2", "d1", "d0"]);

    // Already at the top: no move, no signal.
    assert!(!native.raise_to_top(&items[0]));
    assert!(!native.raise(&items[0]));
    assert_eq!(ids(&c.values()), vec!["d2", "d1", "d0"]);
}

#[test]
fn imagery_moves_and_visibility_keep_values_coherent() {
    let native = Arc::new(ImageryLayerCollection::<Thing>::new());
    let mut c = Collection::new(Arc::clone(&native));
    let layers = things("l", 3);
    c.add_many(layers.clone(), &AddOptions::default()).unwrap();

    assert!(native.lower(&layers[2]));
    assert_eq!(ids(&c.values()), vec!["l0", "l2", "l1"]);

    assert!(native.set_shown(&layers[1], false));
    assert_eq!(layers[1].shown(), Some(false));
    assert_eq!(ids(&c.values()), vec!["l0", "l2", "l1"]);
}

#[test]
fn every_native_signal_is_subscribed() {
    let native = Arc::new(ImageryLayerCollection::<Thing>::new());
    let _c = Collection::new(Arc::clone(&native));
    assert_eq!(native.layer_added().size(), 1);
    assert_eq!(native.layer_moved().size(), 1);
    assert_eq!(native.layer_removed().size(), 1);
    assert_eq!(native.layer_shown_or_hidden().size(), 1);
}

#[test]
fn bridge_can_be_disabled() {
    let native = Arc::new(PrimitiveCollection::<Thing>::new());
    let mut c = Collection::with_options(
        Arc::clone(&native),
        CollectionOptions {
            bridge_native_events: false,
            ..Default::default()
        },
    );
    assert_eq!(native.primitive_added().size(), 0);

    c.add(Thing::new("a"), &AddOptions::default()).unwrap();
    assert_eq!(ids(&c.values()), vec!["a"]);
}

#[test]
fn silent_native_still_sees_local_mutation() {
    let native = Arc::new(SilentNative::default());
    let mut c = Collection::new(Arc::clone(&native));
    c.add(Thing::new("a"), &AddOptions::default()).unwrap();
    assert_eq!(ids(&c.values()), vec!["a"]);

    // No signal to learn from: the snapshot stays until a local mutation.
    native.add(Thing::new("ext"), None).unwrap();
    assert_eq!(ids(&c.values()), vec!["a"]);

    c.add(Thing::new("b"), &AddOptions::default()).unwrap();
    assert_eq!(ids(&c.values()), vec!["a", "ext", "b"]);
}

// ============================================================================
// Rebuild counting
// ============================================================================

#[test]
fn repeated_reads_rebuild_once() {
    let (native, mut c) = counting();
    c.add_many(things("v", 1000), &AddOptions::default()).unwrap();

    let first = c.values();
    let second = c.values();

    assert_eq!(native.values_calls(), 1);
    assert_eq!(first.len(), 1000);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn each_local_mutation_triggers_one_rebuild() {
    let (native, mut c) = counting();
    c.add_many(things("v", 3), &AddOptions::default()).unwrap();
    c.values();
    c.values();
    assert_eq!(native.values_calls(), 1);

    c.remove(&Thing::new("v0"));
    c.values();
    c.values();
    assert_eq!(native.values_calls(), 2);

    c.remove_all();
    assert!(c.values().is_empty());
    assert_eq!(native.values_calls(), 3);
}

#[test]
fn external_mutation_triggers_one_rebuild() {
    let (native, mut c) = counting();
    c.add_many(things("v", 2), &AddOptions::default()).unwrap();
    c.values();

    native.inner().add(Thing::new("ext"), Some(0)).unwrap();
    assert_eq!(ids(&c.values()), vec!["ext", "v0", "v1"]);
    c.values();

    assert_eq!(native.values_calls(), 2);
}

#[test]
fn retagging_does_not_rebuild() {
    let (native, mut c) = counting();
    c.add_many(things("v", 4), &AddOptions::tagged("a")).unwrap();
    let before = c.values();

    assert_eq!(c.update("a", "b"), 4);
    let after = c.values();

    assert_eq!(native.values_calls(), 1);
    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn iteration_uses_cached_values() {
    let (native, mut c) = counting();
    c.add_many(things("i", 5), &AddOptions::default()).unwrap();

    let snapshot = c.values();
    let iterated: Vec<Thing> = (&c).into_iter().collect();
    let mut looped = Vec::new();
    for item in &c {
        looped.push(item);
    }

    assert_eq!(native.values_calls(), 1);
    assert_eq!(iterated, snapshot.to_vec());
    assert_eq!(looped, snapshot.to_vec());
    assert_eq!(c.iter().len(), 5);
}

#[test]
fn no_duplicates_after_mixed_mutation() {
    let (native, mut c) = counting();
    c.add_many(things("m", 3), &AddOptions::tagged("t")).unwrap();
    native.inner().add(Thing::new("x"), None).unwrap();
    c.remove_by_tag("t");
    native.inner().add(Thing::new("y"), Some(0)).unwrap();
    c.add(Thing::new("z"), &AddOptions::default()).unwrap();

    assert_eq!(ids(&c.values()), vec!["y", "x", "z"]);
    assert_eq!(ids(&c.values()), ids(&native.inner().values()));
}
