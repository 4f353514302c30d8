//! Namespaced in-memory storage for stashe.
//!
//! A [`Store`] maps each [`Identifier`](stashe_types::Identifier) to an
//! isolated root [`Node`]. Nodes are shared, mutable maps from keys to
//! [`Value`]s; a value may itself be a node, which is how nested data is
//! built.
//!
//! # Deep paths
//!
//! [`Node::get_deep`], [`Node::set_deep`] and [`Node::remove_deep`] walk a
//! [`Path`](stashe_types::Path) one key at a time. At each intermediate key:
//!
//! 1. an existing node is descended into;
//! 2. an existing truthy non-node value is left alone and the walk becomes
//!    detached (reads see nothing, writes and removals are dropped);
//! 3. anything else (absent or falsy) is replaced by a fresh empty node.
//!
//! All three operations share this walk, so a deep read of a missing path
//! creates the empty intermediate nodes, just like a deep write.
//!
//! # Key safety
//!
//! User keys are never stored as-is. Each is mapped to a [`SafeKey`] on the
//! way in and mapped back on the way out, so no user key can alias anything
//! the store uses internally.
//!
//! # Cycles
//!
//! Composites are shared, so a node can end up inside itself. JSON
//! rendering turns such a back-reference into `null`, and `Debug` prints
//! `{..}` (or `[..]` for a list) instead of recursing.

mod cycle;
pub mod node;
pub mod safe_key;
pub mod store;
pub mod value;

pub use node::Node;
pub use safe_key::SafeKey;
pub use store::Store;
pub use value::{Callable, Value};
