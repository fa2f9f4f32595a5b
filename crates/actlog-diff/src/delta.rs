//! Result types of the diff operations.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// One differing leaf with both sides.
///
/// A side is `None` when the key does not exist there; it is then omitted
/// from the serialised form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// The value in the previous snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    /// The value in the current snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl Change {
    /// Renders the change as `{"oldValue": .., "newValue": ..}`.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        if let Some(old) = &self.old_value {
            out.insert("oldValue".to_string(), old.clone());
        }
        if let Some(new) = &self.new_value {
            out.insert("newValue".to_string(), new.clone());
        }
        Value::Object(out)
    }
}

/// A node of a diff result: a differing leaf or a branch that contains at
/// least one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Delta<L> {
    /// A differing leaf.
    Leaf(L),
    /// A non-empty branch.
    Nested(BTreeMap<String, Delta<L>>),
}

impl<L> Delta<L> {
    /// Returns the leaf, if this node is one.
    pub fn as_leaf(&self) -> Option<&L> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Nested(_) => None,
        }
    }

    /// Returns the child at `key`, if this node is a branch.
    pub fn get(&self, key: &str) -> Option<&Delta<L>> {
        match self {
            Self::Leaf(_) => None,
            Self::Nested(children) => children.get(key),
        }
    }

    fn render(&self, leaf: &impl Fn(&L) -> Value) -> Value {
        match self {
            Self::Leaf(value) => leaf(value),
            Self::Nested(children) => Value::Object(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.render(leaf)))
                    .collect(),
            ),
        }
    }

    fn collect_leaves<'a>(
        &'a self,
        path: &mut Vec<String>,
        out: &mut Vec<(Vec<String>, &'a L)>,
    ) {
        match self {
            Self::Leaf(value) => out.push((path.clone(), value)),
            Self::Nested(children) => {
                for (key, child) in children {
                    path.push(key.clone());
                    child.collect_leaves(path, out);
                    path.pop();
                }
            }
        }
    }
}

/// The top level of a diff result, keyed like the compared objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeltaTree<L>(BTreeMap<String, Delta<L>>);

/// Old/new pairs for every differing leaf.
pub type ChangeSet = DeltaTree<Change>;

/// New values for every differing leaf; `None` marks a removed key.
pub type Patch = DeltaTree<Option<Value>>;

impl<L> DeltaTree<L> {
    pub(crate) fn from_map(map: BTreeMap<String, Delta<L>>) -> Self {
        Self(map)
    }

    /// Whether no leaf differs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the top-level node at `key`.
    pub fn get(&self, key: &str) -> Option<&Delta<L>> {
        self.0.get(key)
    }

    /// Follows `path` through nested branches.
    pub fn at(&self, path: &[&str]) -> Option<&Delta<L>> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.0.get(*first)?, |node, key| node.get(key))
    }

    /// Iterates the top-level entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Delta<L>)> {
        self.0.iter()
    }

    /// Every leaf with its key path from the root, in key order.
    pub fn leaves(&self) -> Vec<(Vec<String>, &L)> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        for (key, node) in &self.0 {
            path.push(key.clone());
            node.collect_leaves(&mut path, &mut out);
            path.pop();
        }
        out
    }

    /// Consumes the tree, returning the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, Delta<L>> {
        self.0
    }

    fn render(&self, leaf: &impl Fn(&L) -> Value) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(key, node)| (key.clone(), node.render(leaf)))
                .collect(),
        )
    }
}

impl DeltaTree<Change> {
    /// Renders the change set as a JSON object.
    pub fn to_json(&self) -> Value {
        self.render(&Change::to_json)
    }
}

impl DeltaTree<Option<Value>> {
    /// Renders the patch as a JSON object; removed keys become `null`.
    pub fn to_json(&self) -> Value {
        self.render(&|value: &Option<Value>| value.clone().unwrap_or(Value::Null))
    }
}

impl<L> Default for DeltaTree<L> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}
