use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use stashe_types::{Key, Path};
use tracing::{debug, trace};

use crate::cycle::{Ancestors, FormatGuard};
use crate::safe_key::SafeKey;
use crate::value::Value;

/// A shared, mutable map from keys to values.
///
/// `Node` is a handle: clones refer to the same map. Keys are stored in
/// their [`SafeKey`] form and every public method takes and returns user
/// [`Key`]s.
#[derive(Clone, Default)]
pub struct Node {
    entries: Rc<RefCell<BTreeMap<SafeKey, Value>>>,
}

/// Where a deep walk ended up after the intermediate keys.
enum Cursor {
    /// A node that the final key is applied to.
    Attached(Node),
    /// The walk hit a truthy non-node value. Nothing below it is reachable.
    Detached,
}

impl Node {
    /// Create an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Shallow access ----

    /// Look up `key`. `None` means the key was never set or was removed.
    pub fn get(&self, key: impl Into<Key>) -> Option<Value> {
        let safe = SafeKey::from_key(&key.into());
        self.entries.borrow().get(&safe).cloned()
    }

    /// Insert or overwrite `key`, returning the stored value.
    pub fn set(&self, key: impl Into<Key>, value: Value) -> Value {
        let safe = SafeKey::from_key(&key.into());
        self.entries.borrow_mut().insert(safe, value.clone());
        value
    }

    /// Remove `key`, returning what was stored. Absent keys are a no-op.
    pub fn remove(&self, key: impl Into<Key>) -> Option<Value> {
        let safe = SafeKey::from_key(&key.into());
        self.entries.borrow_mut().remove(&safe)
    }

    // ---- Deep access ----

    /// Look up the value at `path`.
    ///
    /// Missing intermediate nodes are created on the way down, so this can
    /// grow the tree even though it only reads the final slot. See
    /// [`Node::set_deep`] for which values a walk can pass through.
    pub fn get_deep(&self, path: &Path) -> Option<Value> {
        let (last, parents) = path.split_last();
        match self.walk(parents) {
            Cursor::Attached(node) => node.get(last),
            Cursor::Detached => None,
        }
    }

    /// Store `value` at `path`, creating intermediate nodes as needed.
    ///
    /// If an intermediate slot holds a truthy non-node value, that value is
    /// kept and the write is dropped. The value is returned either way.
    ///
    /// Only [`Value::Node`] is traversable. Lists, functions and opaque
    /// values are always truthy, so a path through one of them is detached:
    /// `set_deep(["arr", "x"], v)` leaves a stored list untouched and a
    /// later `get_deep(["arr", "x"])` returns `None`.
    pub fn set_deep(&self, path: &Path, value: Value) -> Value {
        let (last, parents) = path.split_last();
        match self.walk(parents) {
            Cursor::Attached(node) => node.set(last, value),
            Cursor::Detached => value,
        }
    }

    /// Remove the value at `path`.
    ///
    /// Uses the same walk as [`Node::set_deep`], so missing intermediate
    /// nodes are created before the (then no-op) removal.
    pub fn remove_deep(&self, path: &Path) -> Option<Value> {
        let (last, parents) = path.split_last();
        match self.walk(parents) {
            Cursor::Attached(node) => node.remove(last),
            Cursor::Detached => None,
        }
    }

    fn walk(&self, keys: &[Key]) -> Cursor {
        let mut current = self.clone();
        for key in keys {
            match current.descend(key) {
                Cursor::Attached(next) => current = next,
                Cursor::Detached => return Cursor::Detached,
            }
        }
        Cursor::Attached(current)
    }

    fn descend(&self, key: &Key) -> Cursor {
        let safe = SafeKey::from_key(key);
        let mut entries = self.entries.borrow_mut();
        match entries.get(&safe) {
            Some(Value::Node(child)) => Cursor::Attached(child.clone()),
            Some(existing) if existing.is_truthy() => {
                debug!(key = %key, kind = existing.kind(), "path blocked by non-node value");
                Cursor::Detached
            }
            _ => {
                trace!(key = %key, "creating intermediate node");
                let child = Node::new();
                entries.insert(safe, Value::Node(child.clone()));
                Cursor::Attached(child)
            }
        }
    }

    // ---- Inspection ----

    /// Number of keys directly in this node.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        let safe = SafeKey::from_key(&key.into());
        self.entries.borrow().contains_key(&safe)
    }

    /// User keys directly in this node, in stored order.
    pub fn keys(&self) -> Vec<Key> {
        self.entries.borrow().keys().map(SafeKey::to_key).collect()
    }

    /// Shallow copy of the entries with user keys restored.
    ///
    /// Values are shared with the node, not copied.
    pub fn entries(&self) -> Vec<(Key, Value)> {
        self.entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.to_key(), v.clone()))
            .collect()
    }

    /// `true` if both handles refer to the same map.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }

    pub(crate) fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.entries).cast()
    }

    /// JSON object for this node. Entries JSON cannot carry are omitted,
    /// and a node reached again from inside itself renders as `null`.
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.to_json_within(&mut Ancestors::default())
            .unwrap_or_default()
    }

    /// `None` if this node is already on the walk.
    pub(crate) fn to_json_within(
        &self,
        ancestors: &mut Ancestors,
    ) -> Option<serde_json::Map<String, serde_json::Value>> {
        if !ancestors.enter(self.as_ptr()) {
            return None;
        }
        let map = self
            .entries
            .borrow()
            .iter()
            .filter_map(|(k, v)| {
                v.to_json_within(ancestors)
                    .map(|json| (k.to_key().into_string(), json))
            })
            .collect();
        ancestors.leave();
        Some(map)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(_guard) = FormatGuard::enter(self.as_ptr()) else {
            return f.write_str("{..}");
        };
        let entries = self.entries.borrow();
        f.debug_map()
            .entries(entries.iter().map(|(k, v)| (k.to_key(), v)))
            .finish()
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let node = Node::new();
        for (k, v) in iter {
            node.set(k, v.into());
        }
        node
    }
}
