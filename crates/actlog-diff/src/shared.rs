//! A JSON graph whose containers can be shared and can reference
//! themselves.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use serde_json::{Map, Number, Value};

use crate::node::Node;

/// A JSON value whose arrays and objects are reference counted.
///
/// Cloning a container clones the handle, not the contents, so the same
/// object can be inserted under several keys or inside itself. Containers
/// compare by identity when they appear as leaves of a diff.
#[derive(Clone)]
pub enum SharedValue {
    /// JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(Number),
    /// A string.
    String(String),
    /// A shared array.
    Array(Rc<RefCell<Vec<SharedValue>>>),
    /// A shared object.
    Object(Rc<RefCell<BTreeMap<String, SharedValue>>>),
}

impl SharedValue {
    /// Creates a new, empty object.
    pub fn object() -> Self {
        Self::Object(Rc::new(RefCell::new(BTreeMap::new())))
    }

    /// Creates a new, empty array.
    pub fn array() -> Self {
        Self::Array(Rc::new(RefCell::new(Vec::new())))
    }

    /// Sets `key` on an object. Returns `false` if `self` is not an object.
    pub fn insert(&self, key: impl Into<String>, value: SharedValue) -> bool {
        match self {
            Self::Object(map) => {
                map.borrow_mut().insert(key.into(), value);
                true
            }
            _ => false,
        }
    }

    /// Appends to an array. Returns `false` if `self` is not an array.
    pub fn push(&self, value: SharedValue) -> bool {
        match self {
            Self::Array(items) => {
                items.borrow_mut().push(value);
                true
            }
            _ => false,
        }
    }

    /// Returns a handle to the value at `key` of an object.
    pub fn get(&self, key: &str) -> Option<SharedValue> {
        match self {
            Self::Object(map) => map.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Whether both values are the same container, or equal scalars.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Converts the graph into an owned JSON value.
    ///
    /// A reference back to a container that is already being converted
    /// (a cycle) is rendered as `null`.
    pub fn to_json(&self) -> Value {
        self.to_json_guarded(&mut HashSet::new())
    }

    fn to_json_guarded(&self, ancestors: &mut HashSet<usize>) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Array(items) => {
                let address = Rc::as_ptr(items) as *const () as usize;
                if !ancestors.insert(address) {
                    return Value::Null;
                }
                let out = items
                    .borrow()
                    .iter()
                    .map(|item| item.to_json_guarded(ancestors))
                    .collect();
                ancestors.remove(&address);
                Value::Array(out)
            }
            Self::Object(map) => {
                let address = Rc::as_ptr(map) as *const () as usize;
                if !ancestors.insert(address) {
                    return Value::Null;
                }
                let out: Map<String, Value> = map
                    .borrow()
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_json_guarded(ancestors)))
                    .collect();
                ancestors.remove(&address);
                Value::Object(out)
            }
        }
    }
}

impl From<&Value> for SharedValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n.clone()),
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::Array(Rc::new(RefCell::new(
                items.iter().map(SharedValue::from).collect(),
            ))),
            Value::Object(map) => Self::Object(Rc::new(RefCell::new(
                map.iter()
                    .map(|(key, child)| (key.clone(), SharedValue::from(child)))
                    .collect(),
            ))),
        }
    }
}

impl From<Value> for SharedValue {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

// Containers print as their address; a derived impl would recurse forever
// on a cyclic graph.
impl std::fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Number(n) => write!(f, "Number({n})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Array(items) => write!(f, "Array({:p})", Rc::as_ptr(items)),
            Self::Object(map) => write!(f, "Object({:p})", Rc::as_ptr(map)),
        }
    }
}

impl Node for SharedValue {
    fn entries(&self) -> Option<Vec<(String, Self)>> {
        match self {
            Self::Object(map) => Some(
                map.borrow()
                    .iter()
                    .map(|(key, child)| (key.clone(), child.clone()))
                    .collect(),
            ),
            _ => None,
        }
    }

    fn address(&self) -> usize {
        match self {
            Self::Object(map) => Rc::as_ptr(map) as *const () as usize,
            Self::Array(items) => Rc::as_ptr(items) as *const () as usize,
            _ => 0,
        }
    }

    fn same_leaf(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }

    fn to_value(&self) -> Value {
        self.to_json()
    }
}
