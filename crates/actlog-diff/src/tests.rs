//! Unit tests for the diff engine.

use serde_json::{json, Value};

use crate::{changes, changes_between, patch, patch_between, Change, Delta, SharedValue};

fn obj(value: &Value) -> Option<&serde_json::Map<String, Value>> {
    value.as_object()
}

// ── changes ──────────────────────────────────────────────────────────

#[test]
fn identical_objects_have_no_changes() {
    let a = json!({
        "title": "A",
        "tags": ["x", "y"],
        "meta": { "views": 3, "author": { "name": "kim" } },
        "archived": null,
    });

    assert!(changes(obj(&a), obj(&a)).is_empty());
    assert!(changes(obj(&a), obj(&a.clone())).is_empty());
}

#[test]
fn missing_snapshots_are_empty_objects() {
    assert!(changes(None, None).is_empty());
    assert!(patch(None, None).is_empty());

    let current = json!({ "title": "B" });
    let result = changes(None, obj(&current));
    assert_eq!(result.to_json(), json!({ "title": { "newValue": "B" } }));
}

#[test]
fn title_and_timestamp_scenario() {
    let previous = json!({ "title": "A" });
    let current = json!({ "title": "B", "updatedAt": "T2" });

    let result = changes(obj(&previous), obj(&current));
    assert_eq!(
        result.get("title").and_then(Delta::as_leaf),
        Some(&Change {
            old_value: Some(json!("A")),
            new_value: Some(json!("B")),
        })
    );
    assert_eq!(
        result.get("updatedAt").and_then(Delta::as_leaf),
        Some(&Change {
            old_value: None,
            new_value: Some(json!("T2")),
        })
    );

    let diff = patch(obj(&previous), obj(&current));
    assert_eq!(diff.to_json(), json!({ "title": "B", "updatedAt": "T2" }));
}

#[test]
fn nested_objects_recurse_and_prune_unchanged_branches() {
    let previous = json!({
        "profile": { "name": "kim", "address": { "city": "Oslo", "zip": "0150" } },
        "settings": { "theme": "dark" },
    });
    let current = json!({
        "profile": { "name": "kim", "address": { "city": "Bergen", "zip": "0150" } },
        "settings": { "theme": "dark" },
    });

    let result = changes(obj(&previous), obj(&current));
    assert_eq!(
        result.to_json(),
        json!({
            "profile": { "address": { "city": { "oldValue": "Oslo", "newValue": "Bergen" } } }
        })
    );
    assert!(result.get("settings").is_none());
    assert!(result.at(&["profile", "name"]).is_none());
}

#[test]
fn arrays_are_atomic_leaves() {
    let previous = json!({ "tags": ["a", "b"], "same": [1, 2] });
    let current = json!({ "tags": ["a", "c"], "same": [1, 2] });

    let result = changes(obj(&previous), obj(&current));
    assert_eq!(result.len(), 1);
    assert_eq!(
        result.to_json(),
        json!({ "tags": { "oldValue": ["a", "b"], "newValue": ["a", "c"] } })
    );
}

#[test]
fn object_replaced_by_scalar_is_a_leaf() {
    let previous = json!({ "owner": { "id": 1 } });
    let current = json!({ "owner": 1 });

    let result = changes(obj(&previous), obj(&current));
    assert_eq!(
        result.to_json(),
        json!({ "owner": { "oldValue": { "id": 1 }, "newValue": 1 } })
    );
}

#[test]
fn null_and_missing_are_different() {
    let previous = json!({ "deletedAt": null });
    let current = json!({});

    let result = changes(obj(&previous), obj(&current));
    let leaf = result
        .get("deletedAt")
        .and_then(Delta::as_leaf)
        .expect("deletedAt should be a leaf");
    assert_eq!(leaf.old_value, Some(Value::Null));
    assert_eq!(leaf.new_value, None);
    assert_eq!(result.to_json(), json!({ "deletedAt": { "oldValue": null } }));
}

#[test]
fn change_set_serialises_like_to_json() {
    let previous = json!({ "a": 1, "nested": { "b": true } });
    let current = json!({ "a": 2, "nested": { "b": false }, "c": "new" });

    let result = changes(obj(&previous), obj(&current));
    let serialised = serde_json::to_value(&result).expect("change set should serialise");
    assert_eq!(serialised, result.to_json());
}

// ── patch ────────────────────────────────────────────────────────────

#[test]
fn patch_keeps_only_new_values() {
    let previous = json!({ "title": "A", "meta": { "views": 1, "likes": 2 } });
    let current = json!({ "title": "A", "meta": { "views": 5, "likes": 2 } });

    let diff = patch(obj(&previous), obj(&current));
    assert_eq!(diff.to_json(), json!({ "meta": { "views": 5 } }));
}

#[test]
fn patch_marks_removed_keys_as_null() {
    let previous = json!({ "title": "A", "draft": true });
    let current = json!({ "title": "A" });

    let diff = patch(obj(&previous), obj(&current));
    assert_eq!(diff.get("draft").and_then(Delta::as_leaf), Some(&None));
    assert_eq!(diff.to_json(), json!({ "draft": null }));
}

#[test]
fn every_change_leaf_has_a_matching_patch_leaf() {
    let previous = json!({
        "a": 1,
        "b": { "c": [1], "d": { "e": "x" }, "gone": 0 },
        "f": null,
    });
    let current = json!({
        "a": 2,
        "b": { "c": [2], "d": { "e": "x", "g": false } },
        "h": { "i": 1 },
    });

    let change_set = changes(obj(&previous), obj(&current));
    let diff = patch(obj(&previous), obj(&current));

    let change_leaves = change_set.leaves();
    assert_eq!(change_leaves.len(), diff.leaves().len());
    for (path, change) in change_leaves {
        let keys: Vec<&str> = path.iter().map(String::as_str).collect();
        let patched = diff
            .at(&keys)
            .and_then(Delta::as_leaf)
            .unwrap_or_else(|| panic!("patch is missing leaf at {keys:?}"));
        assert_eq!(patched, &change.new_value, "mismatch at {keys:?}");
    }
}

#[test]
fn no_branch_in_a_result_is_empty() {
    fn assert_no_empty_branch<L>(node: &Delta<L>) {
        if let Delta::Nested(children) = node {
            assert!(!children.is_empty(), "found an empty branch");
            children.values().for_each(assert_no_empty_branch);
        }
    }

    let previous = json!({ "a": { "b": { "c": 1 } }, "d": { "e": 1 }, "f": {} });
    let current = json!({ "a": { "b": { "c": 1 } }, "d": { "e": 2 }, "f": {} });

    let change_set = changes(obj(&previous), obj(&current));
    change_set.iter().for_each(|(_, node)| assert_no_empty_branch(node));
    assert_eq!(change_set.len(), 1);

    let diff = patch(obj(&previous), obj(&current));
    diff.iter().for_each(|(_, node)| assert_no_empty_branch(node));
}

// ── shared graphs ────────────────────────────────────────────────────

fn self_referencing() -> SharedValue {
    let root = SharedValue::object();
    let x = SharedValue::object();
    root.insert("x", x.clone());
    x.insert("self", x.clone());
    root
}

#[test]
fn self_referencing_graph_has_no_changes_against_itself() {
    let a = self_referencing();

    assert!(changes_between(Some(&a), Some(&a)).is_empty());
    assert!(patch_between(Some(&a), Some(&a)).is_empty());
}

#[test]
fn cyclic_graphs_report_their_differences_and_terminate() {
    let build = |views: i64| {
        let root = SharedValue::object();
        let x = SharedValue::object();
        root.insert("x", x.clone());
        x.insert("self", x.clone());
        x.insert("views", SharedValue::from(json!(views)));
        root
    };
    let previous = build(1);
    let current = build(2);

    let change_set = changes_between(Some(&previous), Some(&current));
    assert_eq!(
        change_set.to_json(),
        json!({ "x": { "views": { "oldValue": 1, "newValue": 2 } } })
    );

    let diff = patch_between(Some(&previous), Some(&current));
    assert_eq!(diff.to_json(), json!({ "x": { "views": 2 } }));
}

#[test]
fn shared_arrays_compare_by_identity() {
    let tags = SharedValue::array();
    tags.push(SharedValue::from(json!("a")));

    let previous = SharedValue::object();
    previous.insert("tags", tags.clone());
    let same = SharedValue::object();
    same.insert("tags", tags);
    assert!(changes_between(Some(&previous), Some(&same)).is_empty());

    let other = SharedValue::object();
    other.insert("tags", SharedValue::from(json!(["a"])));
    let result = changes_between(Some(&previous), Some(&other));
    assert_eq!(
        result.to_json(),
        json!({ "tags": { "oldValue": ["a"], "newValue": ["a"] } })
    );
}

#[test]
fn node_shared_under_two_keys_is_reported_once() {
    let previous = SharedValue::object();
    let shared_old = SharedValue::from(json!({ "v": 1 }));
    previous.insert("left", shared_old.clone());
    previous.insert("right", shared_old);

    let current = SharedValue::object();
    let shared_new = SharedValue::from(json!({ "v": 2 }));
    current.insert("left", shared_new.clone());
    current.insert("right", shared_new);

    // The pair is compared under the first key in key order only.
    let result = changes_between(Some(&previous), Some(&current));
    assert_eq!(
        result.to_json(),
        json!({ "left": { "v": { "oldValue": 1, "newValue": 2 } } })
    );

    let diff = patch_between(Some(&previous), Some(&current));
    assert_eq!(diff.to_json(), json!({ "left": { "v": 2 } }));
}

/// Builds `depth` levels where keys `a` and `b` both point at the same
/// child, ending in `{ "v": leaf }`.
fn diamond(depth: usize, leaf: i64) -> SharedValue {
    let mut node = SharedValue::from(json!({ "v": leaf }));
    for _ in 0..depth {
        let parent = SharedValue::object();
        parent.insert("a", node.clone());
        parent.insert("b", node);
        node = parent;
    }
    node
}

#[test]
fn deep_shared_graph_is_walked_once_per_node_pair() {
    // 2^40 paths reach the bottom; only 41 distinct pairs exist.
    let previous = diamond(40, 1);
    let current = diamond(40, 2);

    let change_set = changes_between(Some(&previous), Some(&current));
    let leaves = change_set.leaves();
    assert_eq!(leaves.len(), 1);

    let (path, change) = &leaves[0];
    assert_eq!(path.len(), 41);
    assert!(path[..40].iter().all(|key| key == "a"));
    assert_eq!(path[40], "v");
    assert_eq!(change.old_value, Some(json!(1)));
    assert_eq!(change.new_value, Some(json!(2)));

    assert_eq!(patch_between(Some(&previous), Some(&current)).leaves().len(), 1);
}

#[test]
fn cyclic_leaf_materialises_back_references_as_null() {
    let previous = SharedValue::object();
    let current = self_referencing();

    let result = changes_between(Some(&previous), Some(&current));
    assert_eq!(
        result.to_json(),
        json!({ "x": { "newValue": { "self": null } } })
    );
}

#[test]
fn non_object_root_is_treated_as_empty() {
    let scalar = SharedValue::from(json!(5));
    let current = SharedValue::from(json!({ "a": 1 }));

    let result = changes_between(Some(&scalar), Some(&current));
    assert_eq!(result.to_json(), json!({ "a": { "newValue": 1 } }));

    let value = json!([1, 2]);
    let other = json!({ "b": 2 });
    let result = changes_between(Some(&&value), Some(&&other));
    assert_eq!(result.to_json(), json!({ "b": { "newValue": 2 } }));
}

#[test]
fn shared_value_round_trips_acyclic_json() {
    let value = json!({ "a": [1, { "b": null }], "c": "d", "e": 1.5, "f": false });
    assert_eq!(SharedValue::from(&value).to_json(), value);
}
