//! Selector resolution over the document tree.

use proptest::prelude::*;
use serde_json::{Value, json};

use scheda_overlay::{AliasRegistry, OverlayError, PathSelector, Traversal};

fn empty_doc() -> Value {
    json!({})
}

#[test]
fn set_then_get_roundtrips_on_mapping_paths() {
    let aliases = AliasRegistry::new();
    let selector = PathSelector::new(&aliases);
    let mut doc = empty_doc();
    let applied = selector
        .set(&mut doc, "a.b.c", json!("value"))
        .expect("set a.b.c");
    assert_eq!(applied.canonical, "a.b.c");
    assert_eq!(applied.traversal, Traversal::Created);
    assert_eq!(
        selector.get(&doc, "a.b.c").expect("get a.b.c"),
        Some(json!("value"))
    );
    assert_eq!(doc, json!({"a": {"b": {"c": "value"}}}));
}

#[test]
fn intermediate_segments_vivify_mappings_never_sequences() {
    let aliases = AliasRegistry::new();
    let selector = PathSelector::new(&aliases);
    let mut doc = empty_doc();
    selector
        .set(&mut doc, "x.y.z", json!(1))
        .expect("set through missing segments");
    assert!(doc["x"].is_object());
    assert!(doc["x"]["y"].is_object());
}

#[test]
fn terminal_append_preserves_order() {
    let aliases = AliasRegistry::new();
    let selector = PathSelector::new(&aliases);
    let mut doc = empty_doc();
    for (i, item) in ["first", "second", "third"].iter().enumerate() {
        let applied = selector
            .set(&mut doc, "list[]", json!(item))
            .expect("append");
        assert_eq!(applied.canonical, format!("list[{}]", i + 1));
    }
    assert_eq!(doc["list"], json!(["first", "second", "third"]));
}

#[test]
fn negative_index_addresses_from_end() {
    let aliases = AliasRegistry::new();
    let selector = PathSelector::new(&aliases);
    let mut doc = empty_doc();
    for item in ["a", "b", "c"] {
        selector.set(&mut doc, "list[]", json!(item)).expect("append");
    }
    let last = selector.get(&doc, "list[-1]").expect("get list[-1]");
    let third = selector.get(&doc, "list[3]").expect("get list[3]");
    assert_eq!(last, third);
    assert_eq!(last, Some(json!("c")));

    selector
        .set(&mut doc, "list[-2]", json!("B"))
        .expect("set list[-2]");
    assert_eq!(doc["list"], json!(["a", "B", "c"]));
}

#[test]
fn delete_then_get_returns_empty_mapping() {
    let aliases = AliasRegistry::new();
    let selector = PathSelector::new(&aliases);
    let mut doc = json!({"stats": {"hp": 10}});
    selector.delete(&mut doc, "stats.hp").expect("delete");
    assert_eq!(
        selector.get(&doc, "stats.hp").expect("get after delete"),
        Some(json!({}))
    );
}

#[test]
fn non_terminal_append_tags_position_and_descends() {
    let aliases = AliasRegistry::new();
    let selector = PathSelector::new(&aliases);
    let mut doc = empty_doc();
    let applied = selector
        .set(&mut doc, "relazioni[].nome", json!("Bruno"))
        .expect("append block");
    assert_eq!(applied.canonical, "relazioni[1].nome");
    assert_eq!(doc["relazioni"][0]["posizione"], json!(1));
    assert_eq!(doc["relazioni"][0]["nome"], json!("Bruno"));

    selector
        .set(&mut doc, "relazioni[].nome", json!("Carla"))
        .expect("append second block");
    assert_eq!(doc["relazioni"][1]["posizione"], json!(2));
    assert_eq!(doc["relazioni"][1]["nome"], json!("Carla"));
}

#[test]
fn indexing_a_non_sequence_is_a_selector_error() {
    let aliases = AliasRegistry::new();
    let selector = PathSelector::new(&aliases);
    let mut doc = json!({"stats": {"hp": 10}});
    let error = selector
        .set(&mut doc, "stats[1]", json!(1))
        .expect_err("index into mapping");
    match error {
        OverlayError::Selector { token, .. } => assert_eq!(token, "stats[1]"),
        other => panic!("expected selector error, got {other}"),
    }
}

#[test]
fn out_of_range_and_zero_indices_fail() {
    let aliases = AliasRegistry::new();
    let selector = PathSelector::new(&aliases);
    let mut doc = json!({"list": ["a"]});
    assert!(selector.set(&mut doc, "list[2]", json!(1)).is_err());
    assert!(selector.set(&mut doc, "list[0]", json!(1)).is_err());
    assert!(selector.set(&mut doc, "list[-2]", json!(1)).is_err());
    assert!(selector.set(&mut doc, "list[1]", json!(1)).is_ok());
}

#[test]
fn indexing_a_missing_sequence_fails() {
    let aliases = AliasRegistry::new();
    let selector = PathSelector::new(&aliases);
    let mut doc = empty_doc();
    assert!(selector.set(&mut doc, "absent[1]", json!(1)).is_err());
}

#[test]
fn alias_tokens_rewrite_before_traversal() {
    let mut aliases = AliasRegistry::new();
    aliases.register("A", "x.y");
    let selector = PathSelector::new(&aliases);
    let mut doc = empty_doc();
    let applied = selector.set(&mut doc, "A.z", json!(7)).expect("set via alias");
    assert_eq!(applied.canonical, "x.y.z");
    assert_eq!(doc, json!({"x": {"y": {"z": 7}}}));
    assert_eq!(selector.get(&doc, "A.z").expect("get via alias"), Some(json!(7)));
}

#[test]
fn alias_registration_overwrites_and_roundtrips() {
    let mut aliases = AliasRegistry::new();
    aliases.register("A", "x.y[2]");
    assert_eq!(aliases.resolve("A"), "x.y[2]");
    assert_eq!(aliases.alias_for("x.y[2]"), Some("A"));
    assert_eq!(aliases.resolve("unknown"), "unknown");
    aliases.register("A", "other");
    assert_eq!(aliases.resolve("A"), "other");
}

proptest! {
    /// For paths composed only of mapping segments, set followed by get on
    /// the same path returns the value unchanged.
    #[test]
    fn set_get_roundtrip_for_mapping_paths(
        segments in prop::collection::vec("[a-z]{1,6}", 1..4),
        value in "[ -~]{0,12}",
    ) {
        let aliases = AliasRegistry::new();
        let selector = PathSelector::new(&aliases);
        let mut doc = empty_doc();
        let path = segments.join(".");
        selector.set(&mut doc, &path, json!(value.clone())).expect("set");
        let read = selector.get(&doc, &path).expect("get");
        prop_assert_eq!(read, Some(json!(value)));
    }

    /// Size after N terminal appends equals N, in call order.
    #[test]
    fn append_count_matches_calls(items in prop::collection::vec("[a-z]{1,4}", 1..8)) {
        let aliases = AliasRegistry::new();
        let selector = PathSelector::new(&aliases);
        let mut doc = empty_doc();
        for item in &items {
            selector.set(&mut doc, "list[]", json!(item)).expect("append");
        }
        let stored = doc["list"].as_array().expect("list is a sequence");
        prop_assert_eq!(stored.len(), items.len());
        for (stored_item, item) in stored.iter().zip(&items) {
            prop_assert_eq!(stored_item, &json!(item));
        }
    }
}
