use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use stashe_store::{Node, Value};
use stashe_types::Path;

/// Plain-tree copy of a cache's data with user keys restored.
///
/// Nodes become [`Snapshot::Branch`]es; everything else becomes a
/// [`Snapshot::Leaf`] that shares the stored value. Editing the snapshot's
/// structure does not touch the cache, but mutating a shared composite
/// leaf does.
///
/// A node that contains itself is expanded once. The back-reference stays a
/// `Leaf(Value::Node(..))` sharing the node, and renders as `null` in JSON.
#[derive(Clone, Debug, PartialEq)]
pub enum Snapshot {
    Branch(BTreeMap<String, Snapshot>),
    Leaf(Value),
}

impl Snapshot {
    /// Export `node` and everything below it.
    pub fn of(node: &Node) -> Self {
        Self::branch(node, &mut vec![node.clone()])
    }

    /// `ancestors` holds `node` and every node above it.
    fn branch(node: &Node, ancestors: &mut Vec<Node>) -> Self {
        let branch = node
            .entries()
            .into_iter()
            .map(|(key, value)| {
                let child = match value {
                    Value::Node(inner) if !ancestors.iter().any(|a| a.ptr_eq(&inner)) => {
                        ancestors.push(inner.clone());
                        let child = Self::branch(&inner, ancestors);
                        ancestors.pop();
                        child
                    }
                    leaf => Self::Leaf(leaf),
                };
                (key.into_string(), child)
            })
            .collect();
        Self::Branch(branch)
    }

    /// Child of a branch. `None` for leaves and missing keys.
    pub fn get(&self, key: &str) -> Option<&Snapshot> {
        match self {
            Self::Branch(children) => children.get(key),
            Self::Leaf(_) => None,
        }
    }

    /// Descend along `path`. Never creates anything.
    pub fn get_path(&self, path: &Path) -> Option<&Snapshot> {
        path.keys()
            .iter()
            .try_fold(self, |current, key| current.get(key.as_str()))
    }

    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&BTreeMap<String, Snapshot>> {
        match self {
            Self::Branch(children) => Some(children),
            Self::Leaf(_) => None,
        }
    }

    /// `true` for a branch without children.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Branch(children) if children.is_empty())
    }

    /// JSON rendering. Leaves JSON cannot carry are dropped from branches.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Branch(children) => serde_json::Value::Object(
                children
                    .iter()
                    .filter_map(|(key, child)| child.to_json_entry().map(|json| (key.clone(), json)))
                    .collect(),
            ),
            Self::Leaf(Value::Node(_)) => serde_json::Value::Null,
            Self::Leaf(value) => value.to_json().unwrap_or(serde_json::Value::Null),
        }
    }

    fn to_json_entry(&self) -> Option<serde_json::Value> {
        match self {
            Self::Branch(_) | Self::Leaf(Value::Node(_)) => Some(self.to_json()),
            Self::Leaf(value) => value.to_json(),
        }
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
