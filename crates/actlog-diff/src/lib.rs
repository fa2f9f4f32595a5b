//! Structural diffing of JSON object graphs.
//!
//! Two pure operations compare a `previous` and a `current` snapshot:
//!
//! | Operation | Leaf holds | Example leaf |
//! |-----------|-----------|--------------|
//! | [`changes`] | old and new value | `{"oldValue": "A", "newValue": "B"}` |
//! | [`patch`] | new value only | `"B"` |
//!
//! Both walk the union of keys of the two objects and recurse only where
//! both sides hold a plain object. Arrays and scalars are compared as atomic
//! leaves. Branches without a differing descendant are pruned, so every key
//! in a result leads to at least one changed leaf.
//!
//! A missing snapshot (`None`) is treated as an empty object.
//!
//! # Shared and cyclic graphs
//!
//! `serde_json::Value` trees are owned and therefore acyclic. Graphs that
//! share nodes, including self-referencing ones, are expressed with
//! [`SharedValue`] and compared through [`changes_between`] and
//! [`patch_between`]. The traversal records every pair of object nodes it
//! has compared; a pair that is reached again, through a cycle or through
//! a node shared under several keys, contributes no further changes. Each
//! distinct pair is therefore walked once, which bounds the work by the
//! number of distinct pairs and guarantees termination.
//!
//! # Usage
//!
//! ```rust
//! use serde_json::json;
//!
//! let previous = json!({ "title": "A" });
//! let current = json!({ "title": "B", "updatedAt": "T2" });
//!
//! let changes = actlog_diff::changes(previous.as_object(), current.as_object());
//! assert_eq!(
//!     changes.to_json(),
//!     json!({
//!         "title": { "oldValue": "A", "newValue": "B" },
//!         "updatedAt": { "newValue": "T2" },
//!     })
//! );
//!
//! let patch = actlog_diff::patch(previous.as_object(), current.as_object());
//! assert_eq!(patch.to_json(), json!({ "title": "B", "updatedAt": "T2" }));
//! ```

mod delta;
mod node;
mod shared;
mod walk;

pub use delta::{Change, ChangeSet, Delta, DeltaTree, Patch};
pub use node::Node;
pub use shared::SharedValue;

use serde_json::{Map, Value};
use walk::Root;

/// Computes the old/new pair for every leaf that differs between two
/// objects.
pub fn changes(
    previous: Option<&Map<String, Value>>,
    current: Option<&Map<String, Value>>,
) -> ChangeSet {
    walk::walk(Root::object(previous), Root::object(current), &change_leaf::<&Value>)
}

/// Computes the new value for every leaf that differs between two objects.
///
/// A key that disappeared from `current` maps to `None` (rendered as
/// `null` by [`DeltaTree::to_json`]).
pub fn patch(
    previous: Option<&Map<String, Value>>,
    current: Option<&Map<String, Value>>,
) -> Patch {
    walk::walk(Root::object(previous), Root::object(current), &patch_leaf::<&Value>)
}

/// [`changes`] over any [`Node`] implementation.
///
/// A root that is not an object is treated as an empty object.
pub fn changes_between<N: Node>(previous: Option<&N>, current: Option<&N>) -> ChangeSet {
    walk::walk(Root::of(previous), Root::of(current), &change_leaf::<N>)
}

/// [`patch`] over any [`Node`] implementation.
pub fn patch_between<N: Node>(previous: Option<&N>, current: Option<&N>) -> Patch {
    walk::walk(Root::of(previous), Root::of(current), &patch_leaf::<N>)
}

fn change_leaf<N: Node>(previous: Option<&N>, current: Option<&N>) -> Change {
    Change {
        old_value: previous.map(Node::to_value),
        new_value: current.map(Node::to_value),
    }
}

fn patch_leaf<N: Node>(_previous: Option<&N>, current: Option<&N>) -> Option<Value> {
    current.map(Node::to_value)
}

#[cfg(test)]
mod tests;
