//! Store trees and the state trees derived from them.
//!
//! A [`StoreTree`] nests stores inside ordered sequences and keyed maps. Its
//! derived [`StateTree`] has exactly the same nesting, keys and positions,
//! with each store replaced by that store's current value.

use crate::Reducer;
use crate::action::Action;
use crate::error::{PathSegment, ReduceError, StorePath};
use crate::store::Store;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A node in the shape of the application state
#[derive(Clone, Debug)]
pub enum StoreTree {
    /// A leaf store
    Store(Store),
    /// An ordered sequence of subtrees
    Seq(Vec<StoreTree>),
    /// A keyed mapping of subtrees
    Map(BTreeMap<String, StoreTree>),
}

impl StoreTree {
    /// Build an ordered sequence node
    pub fn seq<I>(children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        Self::Seq(children.into_iter().map(Into::into).collect())
    }

    /// Build a keyed mapping node
    pub fn map<I, K>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Into<String>,
    {
        Self::Map(
            children
                .into_iter()
                .map(|(key, child)| (key.into(), child))
                .collect(),
        )
    }

    /// Number of leaf stores in the tree
    #[must_use]
    pub fn store_count(&self) -> usize {
        match self {
            Self::Store(_) => 1,
            Self::Seq(children) => children.iter().map(Self::store_count).sum(),
            Self::Map(children) => children.values().map(Self::store_count).sum(),
        }
    }
}

impl From<Store> for StoreTree {
    fn from(store: Store) -> Self {
        Self::Store(store)
    }
}

impl Reducer for StoreTree {
    type State = StateTree;
    type Error = ReduceError;

    fn initial_state(&self) -> StateTree {
        match self {
            Self::Store(store) => StateTree::Leaf(store.initial_state()),
            Self::Seq(children) => StateTree::Seq(children.iter().map(Self::initial_state).collect()),
            Self::Map(children) => StateTree::Map(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.initial_state()))
                    .collect(),
            ),
        }
    }

    fn reduce(&self, state: &StateTree, action: &Action) -> Result<StateTree, ReduceError> {
        match (self, state) {
            (Self::Store(store), StateTree::Leaf(value)) => store
                .reduce(value, action)
                .map(StateTree::Leaf)
                .map_err(|source| ReduceError::Handler {
                    path: StorePath::root(),
                    kind: action.kind().to_string(),
                    source,
                }),
            (Self::Seq(children), StateTree::Seq(values)) if children.len() == values.len() => {
                children
                    .iter()
                    .zip(values)
                    .enumerate()
                    .map(|(index, (child, value))| {
                        child
                            .reduce(value, action)
                            .map_err(|e| e.within(PathSegment::Index(index)))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(StateTree::Seq)
            },
            (Self::Map(children), StateTree::Map(values)) if children.len() == values.len() => {
                children
                    .iter()
                    .map(|(key, child)| {
                        let Some(value) = values.get(key) else {
                            return Err(ReduceError::ShapeMismatch {
                                path: StorePath::root(),
                            }
                            .within(PathSegment::Key(key.clone())));
                        };
                        child
                            .reduce(value, action)
                            .map(|next| (key.clone(), next))
                            .map_err(|e| e.within(PathSegment::Key(key.clone())))
                    })
                    .collect::<Result<BTreeMap<_, _>, _>>()
                    .map(StateTree::Map)
            },
            _ => Err(ReduceError::ShapeMismatch {
                path: StorePath::root(),
            }),
        }
    }
}

/// Derived application state, shaped like its [`StoreTree`]
///
/// Leaves are shared: a store that ignores an action keeps the same
/// `Arc<Value>` in the next state tree.
#[derive(Clone, Debug, PartialEq)]
pub enum StateTree {
    /// A store's current value
    Leaf(Arc<Value>),
    /// Values of an ordered sequence of subtrees
    Seq(Vec<StateTree>),
    /// Values of a keyed mapping of subtrees
    Map(BTreeMap<String, StateTree>),
}

impl StateTree {
    /// The leaf value, if this node is a leaf
    #[must_use]
    pub fn leaf(&self) -> Option<&Value> {
        match self {
            Self::Leaf(value) => Some(value.as_ref()),
            Self::Seq(_) | Self::Map(_) => None,
        }
    }

    /// The child stored under `key`, if this node is a mapping
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(children) => children.get(key),
            Self::Leaf(_) | Self::Seq(_) => None,
        }
    }

    /// The child at `index`, if this node is a sequence
    #[must_use]
    pub fn index(&self, index: usize) -> Option<&Self> {
        match self {
            Self::Seq(children) => children.get(index),
            Self::Leaf(_) | Self::Map(_) => None,
        }
    }

    /// Resolve a JSON pointer (`/storeA/propAA`) against the state
    ///
    /// The pointer walks the tree first and continues inside the leaf value
    /// it lands on.
    ///
    /// # Example
    ///
    /// ```
    /// use composable_flux_core::{Reducer, Store, StoreTree};
    /// use serde_json::json;
    ///
    /// let tree = StoreTree::map([(
    ///     "lists",
    ///     StoreTree::seq([Store::new(json!({ "items": [1, 2] })), Store::new(json!({ "items": [] }))]),
    /// )]);
    ///
    /// let state = tree.initial_state();
    /// assert_eq!(state.pointer("/lists/0/items/1"), Some(&json!(2)));
    /// assert_eq!(state.pointer("/lists/2"), None);
    /// ```
    #[must_use]
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        if pointer.is_empty() {
            return self.leaf();
        }
        let rest = pointer.strip_prefix('/')?;

        let (token, tail) = match rest.split_once('/') {
            Some((token, remainder)) => (token, format!("/{remainder}")),
            None => (rest, String::new()),
        };
        let token = token.replace("~1", "/").replace("~0", "~");

        match self {
            Self::Leaf(value) => value.pointer(pointer),
            Self::Seq(children) => children.get(array_index(&token)?)?.pointer(&tail),
            Self::Map(children) => children.get(&token)?.pointer(&tail),
        }
    }

    /// Render the whole tree as plain JSON
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Leaf(value) => Value::clone(value),
            Self::Seq(children) => Value::Array(children.iter().map(Self::to_json).collect()),
            Self::Map(children) => Value::Object(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_json()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

/// An array index token: plain digits, no leading zero (RFC 6901)
fn array_index(token: &str) -> Option<usize> {
    let digits = !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit());
    if !digits || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    token.parse().ok()
}

impl PartialEq<Value> for StateTree {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Leaf(value), other) => value.as_ref() == other,
            (Self::Seq(children), Value::Array(items)) => {
                children.len() == items.len() && children.iter().zip(items).all(|(c, i)| c == i)
            },
            (Self::Map(children), Value::Object(fields)) => {
                children.len() == fields.len()
                    && children
                        .iter()
                        .all(|(key, child)| fields.get(key).is_some_and(|field| child == field))
            },
            _ => false,
        }
    }
}

impl Serialize for StateTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(value) => value.as_ref().serialize(serializer),
            Self::Seq(children) => children.serialize(serializer),
            Self::Map(children) => children.serialize(serializer),
        }
    }
}
