//! The shared traversal behind `changes` and `patch`.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde_json::{Map, Value};

use crate::delta::{Delta, DeltaTree};
use crate::node::Node;

/// The top-level object of one side of a comparison.
pub(crate) struct Root<N> {
    address: usize,
    entries: BTreeMap<String, N>,
}

impl<N: Node> Root<N> {
    /// Missing and non-object roots become an empty object.
    pub(crate) fn of(node: Option<&N>) -> Self {
        match node.and_then(|n| n.entries().map(|entries| (n.address(), entries))) {
            Some((address, entries)) => Self {
                address,
                entries: entries.into_iter().collect(),
            },
            None => Self::empty(),
        }
    }

    fn empty() -> Self {
        Self {
            address: 0,
            entries: BTreeMap::new(),
        }
    }
}

impl<'a> Root<&'a Value> {
    pub(crate) fn object(map: Option<&'a Map<String, Value>>) -> Self {
        match map {
            Some(map) => Self {
                address: map as *const Map<String, Value> as usize,
                entries: map.iter().map(|(key, value)| (key.clone(), value)).collect(),
            },
            None => Self::empty(),
        }
    }
}

/// Compares two roots, producing one leaf per differing value via `leaf`.
pub(crate) fn walk<N, L, F>(previous: Root<N>, current: Root<N>, leaf: &F) -> DeltaTree<L>
where
    N: Node,
    F: Fn(Option<&N>, Option<&N>) -> L,
{
    let mut walker = Walker {
        visited: HashSet::new(),
        leaf,
    };
    let pair = (previous.address, current.address);
    DeltaTree::from_map(walker.compare(pair, previous.entries, current.entries))
}

struct Walker<'f, F> {
    /// Node pairs already compared during this traversal.
    visited: HashSet<(usize, usize)>,
    leaf: &'f F,
}

impl<F> Walker<'_, F> {
    fn compare<N, L>(
        &mut self,
        pair: (usize, usize),
        previous: BTreeMap<String, N>,
        current: BTreeMap<String, N>,
    ) -> BTreeMap<String, Delta<L>>
    where
        N: Node,
        F: Fn(Option<&N>, Option<&N>) -> L,
    {
        let mut result = BTreeMap::new();
        if !self.visited.insert(pair) {
            return result;
        }

        let keys: BTreeSet<&String> = previous.keys().chain(current.keys()).collect();
        for key in keys {
            let old = previous.get(key);
            let new = current.get(key);

            if let (Some(old), Some(new)) = (old, new) {
                if let (Some(old_entries), Some(new_entries)) = (old.entries(), new.entries()) {
                    let nested = self.compare(
                        (old.address(), new.address()),
                        old_entries.into_iter().collect(),
                        new_entries.into_iter().collect(),
                    );
                    if !nested.is_empty() {
                        result.insert(key.clone(), Delta::Nested(nested));
                    }
                    continue;
                }
                if old.same_leaf(new) {
                    continue;
                }
            }

            result.insert(key.clone(), Delta::Leaf((self.leaf)(old, new)));
        }

        result
    }
}
