//! # State Tree
//!
//! Reducers exchange [`State`] handles: reference-counted, immutable nodes of
//! a JSON-shaped tree. A handle carries two notions of sameness:
//!
//! - **Identity** ([`State::ptr_eq`]): both handles point at the same
//!   allocation. Cloning a handle preserves identity. Combinators use
//!   identity to decide whether anything changed without walking the tree.
//! - **Equality** (`PartialEq`): the trees are structurally equal.
//!
//! Nodes are never mutated in place. An update builds a new node and returns
//! a new handle; parts of the tree that did not change keep their identity.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ReducerError;

// ─── Node ────────────────────────────────────────────────────────────

/// One node of the state tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<State>),
    /// Named sections. This is the shape combined reducers produce.
    Map(BTreeMap<String, State>),
}

impl Node {
    /// Short name of the node's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

// ─── State handle ────────────────────────────────────────────────────

/// A shared, immutable handle to a state node.
#[derive(Clone, PartialEq, Eq)]
pub struct State(Arc<Node>);

impl State {
    pub fn new(node: Node) -> Self {
        Self(Arc::new(node))
    }

    pub fn null() -> Self {
        Self::new(Node::Null)
    }

    /// A fresh map with no sections.
    pub fn empty_map() -> Self {
        Self::new(Node::Map(BTreeMap::new()))
    }

    pub fn node(&self) -> &Node {
        &self.0
    }

    /// Whether both handles point at the same node.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub fn kind_name(&self) -> &'static str {
        self.node().kind_name()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.node(), Node::Null)
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, State>> {
        match self.node() {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[State]> {
        match self.node() {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.node() {
            Node::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.node() {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The section stored under `key`, if this is a map that has one.
    pub fn get(&self, key: &str) -> Option<&State> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// A new list holding this list's items followed by `items`.
    ///
    /// The items are shared, not copied, so every element of the result is
    /// identical to the element it came from.
    pub fn appended<I>(&self, items: I) -> Result<State, ReducerError>
    where
        I: IntoIterator<Item = State>,
    {
        let current = self
            .as_list()
            .ok_or_else(|| ReducerError::type_mismatch("list", self))?;
        let mut next = current.to_vec();
        next.extend(items);
        Ok(State::from(next))
    }

    /// Deep conversion into a `serde_json::Value`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.node(), f)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

// ─── Conversions ─────────────────────────────────────────────────────

impl From<Node> for State {
    fn from(node: Node) -> Self {
        Self::new(node)
    }
}

impl From<bool> for State {
    fn from(b: bool) -> Self {
        Self::new(Node::Bool(b))
    }
}

impl From<i64> for State {
    fn from(n: i64) -> Self {
        Self::new(Node::Number(n.into()))
    }
}

impl From<i32> for State {
    fn from(n: i32) -> Self {
        Self::from(i64::from(n))
    }
}

impl From<&str> for State {
    fn from(s: &str) -> Self {
        Self::new(Node::Text(s.to_string()))
    }
}

impl From<String> for State {
    fn from(s: String) -> Self {
        Self::new(Node::Text(s))
    }
}

impl From<Vec<State>> for State {
    fn from(items: Vec<State>) -> Self {
        Self::new(Node::List(items))
    }
}

impl From<BTreeMap<String, State>> for State {
    fn from(map: BTreeMap<String, State>) -> Self {
        Self::new(Node::Map(map))
    }
}

impl FromIterator<(String, State)> for State {
    fn from_iter<I: IntoIterator<Item = (String, State)>>(iter: I) -> Self {
        Self::new(Node::Map(iter.into_iter().collect()))
    }
}

impl From<serde_json::Value> for State {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        let node = match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::Text(s),
            Value::Array(items) => Node::List(items.into_iter().map(State::from).collect()),
            Value::Object(map) => {
                Node::Map(map.into_iter().map(|(k, v)| (k, State::from(v))).collect())
            }
        };
        Self::new(node)
    }
}

impl From<&State> for serde_json::Value {
    fn from(state: &State) -> Self {
        use serde_json::Value;
        match state.node() {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::Text(s) => Value::String(s.clone()),
            Node::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            Node::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

// ─── Serde ───────────────────────────────────────────────────────────

impl Serialize for State {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.node() {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::Text(s) => serializer.serialize_str(s),
            Node::List(items) => items.serialize(serializer),
            Node::Map(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for State {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(State::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clones_share_identity() {
        let a = State::from(vec![State::from(1)]);
        let b = a.clone();
        assert!(State::ptr_eq(&a, &b));
    }

    #[test]
    fn equal_trees_are_not_identical() {
        let a = State::from(json!({"a": 0, "b": 1}));
        let b = State::from(json!({"a": 0, "b": 1}));
        assert_eq!(a, b);
        assert!(!State::ptr_eq(&a, &b));
    }

    #[test]
    fn appended_shares_elements() {
        let entire = State::from(json!({"a": [0]}));
        let list = State::from(vec![State::from(0)]);
        let next = list
            .appended([State::from("a"), entire.clone()])
            .unwrap();
        assert_eq!(next.to_json(), json!([0, "a", {"a": [0]}]));
        let items = next.as_list().unwrap();
        assert!(State::ptr_eq(&items[2], &entire));
        assert!(State::ptr_eq(&items[0], &list.as_list().unwrap()[0]));
    }

    #[test]
    fn appended_rejects_non_list() {
        let err = State::from("text").appended([State::null()]).unwrap_err();
        assert_eq!(
            err,
            ReducerError::TypeMismatch {
                expected: "list",
                found: "text"
            }
        );
    }

    #[test]
    fn json_conversion_preserves_shape() {
        let value = json!({"n": null, "t": true, "x": 1.5, "s": "s", "l": [1, [2]], "m": {}});
        let state = State::from(value.clone());
        assert_eq!(state.to_json(), value);
        assert_eq!(serde_json::to_value(&state).unwrap(), value);
        let parsed: State = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn accessors() {
        let state = State::from(json!({"a": 3, "b": "x", "c": false}));
        assert_eq!(state.get("a").and_then(State::as_i64), Some(3));
        assert_eq!(state.get("b").and_then(State::as_str), Some("x"));
        assert!(state.get("missing").is_none());
        assert!(State::from(1).get("a").is_none());
        assert!(State::null().is_null());
        assert_eq!(state.to_string(), r#"{"a":3,"b":"x","c":false}"#);
    }
}
