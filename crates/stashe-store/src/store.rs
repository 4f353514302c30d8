//! The registry of per-instance data segments.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use stashe_types::Identifier;
use tracing::debug;

use crate::node::Node;

thread_local! {
    static GLOBAL_STORE: Rc<Store> = Store::shared();
}

/// Maps identifiers to isolated root nodes.
///
/// Segments are created lazily by [`Store::resolve_root`] and live as long
/// as the store. Nothing is ever removed; [`Store::flush`] swaps a segment's
/// root for an empty one.
///
/// Not thread-safe. Share a store between caches with `Rc<Store>`.
#[derive(Default)]
pub struct Store {
    segments: RefCell<HashMap<Identifier, Node>>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store behind an `Rc`, ready to hand to caches.
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// The default store for the current thread.
    ///
    /// Created on first access and dropped when the thread exits.
    pub fn global() -> Rc<Self> {
        GLOBAL_STORE.with(Rc::clone)
    }

    /// The root node for `id`, created empty if it does not exist yet.
    pub fn resolve_root(&self, id: &Identifier) -> Node {
        let mut segments = self.segments.borrow_mut();
        if let Some(root) = segments.get(id) {
            return root.clone();
        }
        debug!(id = %id, "creating segment");
        let root = Node::new();
        segments.insert(id.clone(), root.clone());
        root
    }

    /// Replace the root for `id` with an empty node and return it.
    ///
    /// Only `id`'s segment is affected. Existing handles to the old root
    /// keep its data but are no longer reachable through the store.
    pub fn flush(&self, id: &Identifier) -> Node {
        let root = Node::new();
        let previous = self.segments.borrow_mut().insert(id.clone(), root.clone());
        debug!(
            id = %id,
            discarded = previous.as_ref().map_or(0, Node::len),
            "flushed segment"
        );
        root
    }

    /// `true` if a segment exists for `id`.
    pub fn contains(&self, id: &Identifier) -> bool {
        self.segments.borrow().contains_key(id)
    }

    /// Number of segments, including empty and orphaned ones.
    pub fn segment_count(&self) -> usize {
        self.segments.borrow().len()
    }

    /// All identifiers with a segment, sorted.
    pub fn identifiers(&self) -> Vec<Identifier> {
        let mut ids: Vec<Identifier> = self.segments.borrow().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("segment_count", &self.segment_count())
            .finish()
    }
}
