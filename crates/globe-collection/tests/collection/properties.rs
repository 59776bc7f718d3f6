//! show / hide / toggle and set_property.

use std::sync::Arc;

use globe_collection::collection::Collection;
use globe_collection::error::{CollectionError, PropertyError};
use globe_collection::native::{Item, PrimitiveCollection};
use globe_collection::property::{get_path, root_prototype, Object, Property};
use globe_collection::types::{AddOptions, SetPropertyReport, Tag};
use serde_json::json;

use super::support::{things, CountingNative, Thing};

fn collection() -> Collection<PrimitiveCollection<Thing>> {
    Collection::new(Arc::new(PrimitiveCollection::new()))
}

fn t(tag: &str) -> Option<Tag> {
    Some(Tag::from(tag))
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn hide_show_toggle_count_affected_items() {
    let mut c = collection();
    let items = things("v", 3);
    c.add_many(items.clone(), &AddOptions::tagged("t")).unwrap();

    assert_eq!(c.hide("t"), 3);
    assert!(items.iter().all(|i| i.shown() == Some(false)));

    assert_eq!(c.show("t"), 3);
    assert!(items.iter().all(|i| i.shown() == Some(true)));

    items[0].set_shown(false);
    assert_eq!(c.toggle("t"), 3);
    assert_eq!(
        items.iter().map(|i| i.shown()).collect::<Vec<_>>(),
        vec![Some(true), Some(false), Some(false)]
    );
}

#[test]
fn items_without_visibility_are_skipped() {
    let mut c = collection();
    c.add(Thing::new("vis"), &AddOptions::tagged("t")).unwrap();
    c.add(Thing::bare("plain"), &AddOptions::tagged("t")).unwrap();

    assert_eq!(c.hide("t"), 1);
    assert_eq!(c.toggle("t"), 1);
}

#[test]
fn visibility_on_unknown_tag_is_zero() {
    let c = collection();
    assert_eq!(c.show("ghost"), 0);
    assert_eq!(c.hide(4_i64), 0);
    assert_eq!(c.toggle("ghost"), 0);
}

#[test]
fn visibility_only_touches_the_tag() {
    let mut c = collection();
    let a = Thing::new("a");
    let b = Thing::new("b");
    c.add(a.clone(), &AddOptions::tagged("a")).unwrap();
    c.add(b.clone(), &AddOptions::tagged("b")).unwrap();

    c.hide("a");

    assert_eq!(a.shown(), Some(false));
    assert_eq!(b.shown(), Some(true));
}

// ============================================================================
// set_property
// ============================================================================

#[test]
fn sets_nested_property_on_tag_members() {
    let mut c = collection();
    let styled = Thing::with_properties("s", json!({ "label": { "scale": 1 } }));
    let other = Thing::with_properties("o", json!({ "label": { "scale": 1 } }));
    c.add(styled.clone(), &AddOptions::tagged("t")).unwrap();
    c.add(other.clone(), &AddOptions::tagged("u")).unwrap();

    let report = c.set_property("label.scale", json!(2.5), t("t")).unwrap();

    assert_eq!(
        report,
        SetPropertyReport {
            applied: 1,
            skipped: 0,
            rejected: 0
        }
    );
    assert_eq!(get_path(&styled.object(), "label.scale"), Some(json!(2.5)));
    assert_eq!(get_path(&other.object(), "label.scale"), Some(json!(1)));
}

#[test]
fn missing_intermediate_is_a_per_item_no_op() {
    let mut c = collection();
    let with_a = Thing::with_properties("with", json!({ "a": {} }));
    let without = Thing::with_properties("without", json!({ "z": 1 }));
    c.add(with_a.clone(), &AddOptions::tagged("t")).unwrap();
    c.add(without.clone(), &AddOptions::tagged("t")).unwrap();

    let report = c.set_property("a.b", json!(5), t("t")).unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(get_path(&with_a.object(), "a.b"), Some(json!(5)));
    assert_eq!(without.object().read().to_json(), json!({ "z": 1 }));
}

#[test]
fn items_without_properties_are_skipped() {
    let mut c = collection();
    c.add(Thing::bare("bare"), &AddOptions::default()).unwrap();
    c.add(Thing::new("full"), &AddOptions::default()).unwrap();

    let report = c.set_property("width", json!(2), None).unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.total(), 2);
}

#[test]
fn prototype_pollution_is_refused() {
    let mut c = collection();
    c.add_many(things("p", 3), &AddOptions::default()).unwrap();

    let report = c
        .set_property("__proto__.polluted", json!("bad"), None)
        .unwrap();
    assert_eq!(report.rejected, 3);
    assert_eq!(report.applied, 0);

    let report = c
        .set_property("constructor.prototype.polluted", json!("bad"), None)
        .unwrap();
    assert_eq!(report.rejected, 3);

    assert!(root_prototype().read().get("polluted").is_none());
    assert!(Object::new().read().get("polluted").is_none());
    for item in c.values().iter() {
        assert!(item.object().read().get("polluted").is_none());
    }
}

#[test]
fn alias_of_root_prototype_is_refused() {
    let mut c = collection();
    let sneaky = Object::new();
    sneaky
        .write()
        .define("base", Property::Object(Arc::clone(root_prototype())));
    c.add(Thing::with_object("s", sneaky), &AddOptions::default())
        .unwrap();

    let report = c.set_property("base.polluted", json!(1), None).unwrap();

    assert_eq!(report.rejected, 1);
    assert!(!root_prototype().read().has_own("polluted"));
}

#[test]
fn read_only_property_fails_loudly_after_earlier_writes() {
    let mut c = collection();
    let plain = Thing::with_properties("plain", json!({ "name": "x" }));
    let locked_obj = Object::new();
    locked_obj
        .write()
        .define("name", Property::getter(|| json!("fixed")));
    let locked = Thing::with_object("locked", locked_obj);
    let after = Thing::with_properties("after", json!({ "name": "x" }));
    c.add_many(
        [plain.clone(), locked, after.clone()],
        &AddOptions::default(),
    )
    .unwrap();

    let err = c.set_property("name", json!("new"), None).unwrap_err();

    assert!(matches!(
        err,
        CollectionError::Property(PropertyError::ReadOnly { .. })
    ));
    assert_eq!(get_path(&plain.object(), "name"), Some(json!("new")));
    assert_eq!(get_path(&after.object(), "name"), Some(json!("x")));
}

#[test]
fn method_property_is_not_overwritten() {
    let mut c = collection();
    c.add(Thing::new("m"), &AddOptions::default()).unwrap();

    let err = c.set_property("toString", json!(0), None).unwrap_err();
    assert!(matches!(
        err,
        CollectionError::Property(PropertyError::Function { .. })
    ));
}

#[test]
fn set_property_leaves_cache_and_tags_alone() {
    let native = Arc::new(CountingNative::new());
    let mut c = Collection::new(Arc::clone(&native));
    c.add_many(things("c", 2), &AddOptions::tagged("t")).unwrap();
    let before = c.values();

    c.set_property("width", json!(3), t("t")).unwrap();
    c.set_property("width", json!(4), None).unwrap();

    assert!(Arc::ptr_eq(&before, &c.values()));
    assert_eq!(native.values_calls(), 1);
    assert_eq!(c.get("t").len(), 2);
}
