//! Read access to the nodes of a JSON-like graph.

use serde_json::Value;

/// A node of a JSON-like graph that the diff walk can traverse.
///
/// Implementations decide what counts as a plain object (recursed into),
/// how two leaves are compared, and how a node is identified for cycle
/// detection.
pub trait Node: Sized {
    /// Returns the entries of a plain object, or `None` for every other
    /// node kind (scalars and arrays are leaves).
    fn entries(&self) -> Option<Vec<(String, Self)>>;

    /// A stable identity for this node while the graph is borrowed.
    ///
    /// Only consulted for object nodes.
    fn address(&self) -> usize;

    /// Whether two leaves are identical.
    fn same_leaf(&self, other: &Self) -> bool;

    /// Materialises the node as an owned JSON value.
    fn to_value(&self) -> Value;
}

impl<'a> Node for &'a Value {
    fn entries(&self) -> Option<Vec<(String, Self)>> {
        let value: &'a Value = *self;
        value
            .as_object()
            .map(|map| map.iter().map(|(key, child)| (key.clone(), child)).collect())
    }

    fn address(&self) -> usize {
        let value: &'a Value = *self;
        value as *const Value as usize
    }

    // Owned values carry no identity of their own, so arrays and objects
    // compare structurally.
    fn same_leaf(&self, other: &Self) -> bool {
        **self == **other
    }

    fn to_value(&self) -> Value {
        Value::clone(self)
    }
}
