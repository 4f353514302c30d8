use std::fmt;
use std::rc::Rc;

use stashe_store::{Node, Store, Value};
use stashe_types::{Identifier, Key, Path};
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::snapshot::Snapshot;
use crate::stats::{CacheStats, Counters};

/// A handle onto one identifier's segment of a [`Store`].
///
/// Every read, write and removal goes to the store segment named by the
/// cache's current identifier. Two caches with different identifiers never
/// see each other's data; two caches with the same identifier share it.
///
/// Single keys and [`Path`]s are separate entry points: `get`/`set`/`remove`
/// take one top-level key, the `_path` variants walk nested nodes.
pub struct Cache {
    store: Rc<Store>,
    id: Identifier,
    config: CacheConfig,
    counters: Counters,
}

impl Cache {
    /// A cache on the current thread's global store.
    ///
    /// `None` assigns the next automatic identifier.
    pub fn create(id: Option<Identifier>) -> Self {
        Self::new(Store::global(), id)
    }

    /// A cache on an explicit store.
    pub fn new(store: Rc<Store>, id: Option<Identifier>) -> Self {
        Self::with_config(store, id, CacheConfig::default())
    }

    /// A cache on an explicit store with custom configuration.
    pub fn with_config(store: Rc<Store>, id: Option<Identifier>, config: CacheConfig) -> Self {
        let id = id.unwrap_or_else(Identifier::next_auto);
        debug!(id = %id, "cache created");
        Self {
            store,
            id,
            config,
            counters: Counters::default(),
        }
    }

    fn root(&self) -> Node {
        self.store.resolve_root(&self.id)
    }

    // ---- Identity ----

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Rebind the cache to a different segment.
    ///
    /// Data is not moved. Whatever was stored under the old identifier stays
    /// there, unreachable through this cache; a warning is logged if there
    /// was any.
    pub fn set_id(&mut self, id: impl Into<Identifier>) -> &Identifier {
        let id = id.into();
        let orphaned = self.size();
        if orphaned > 0 && self.config.warn_on_orphan {
            warn!(
                label = %self.config.label,
                old = %self.id,
                new = %id,
                orphaned,
                "id change will orphan data"
            );
        }
        self.id = id;
        &self.id
    }

    pub fn store(&self) -> &Rc<Store> {
        &self.store
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // ---- Reads ----

    /// Value stored under a top-level key. `None` if never set or removed.
    pub fn get(&self, key: impl Into<Key>) -> Option<Value> {
        self.counters.record_read();
        self.root().get(key)
    }

    /// Value stored at `path`.
    ///
    /// Missing intermediate nodes along `path` are created as a side effect.
    pub fn get_path(&self, path: &Path) -> Option<Value> {
        self.counters.record_read();
        self.root().get_deep(path)
    }

    /// `true` if the key holds anything, including `Null` or `Undefined`.
    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.get(key).is_some()
    }

    pub fn has_path(&self, path: &Path) -> bool {
        self.get_path(path).is_some()
    }

    /// `true` if the key holds something other than `Null` or `Undefined`.
    pub fn exists(&self, key: impl Into<Key>) -> bool {
        self.get(key).is_some_and(|v| !v.is_nullish())
    }

    pub fn exists_path(&self, path: &Path) -> bool {
        self.get_path(path).is_some_and(|v| !v.is_nullish())
    }

    // ---- Writes ----

    /// Store `value` under a top-level key.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) -> &Self {
        self.counters.record_write();
        self.root().set(key, value.into());
        self
    }

    /// Store `value` at `path`, creating intermediate nodes.
    ///
    /// A truthy non-node value already sitting on the path is left in place
    /// and the write goes nowhere.
    pub fn set_path(&self, path: &Path, value: impl Into<Value>) -> &Self {
        self.counters.record_write();
        self.root().set_deep(path, value.into());
        self
    }

    /// Alias of [`Cache::set`].
    pub fn put(&self, key: impl Into<Key>, value: impl Into<Value>) -> &Self {
        self.set(key, value)
    }

    /// Return the stored value, or compute, store and return a new one.
    ///
    /// Only an absent key triggers `compute`; a stored `Null` is returned
    /// as is.
    pub fn get_or_set<V, F>(&self, key: impl Into<Key>, compute: F) -> Value
    where
        V: Into<Value>,
        F: FnOnce() -> V,
    {
        self.get_or_set_path(&Path::single(key), compute)
    }

    pub fn get_or_set_path<V, F>(&self, path: &Path, compute: F) -> Value
    where
        V: Into<Value>,
        F: FnOnce() -> V,
    {
        if let Some(existing) = self.get_path(path) {
            return existing;
        }
        let value = compute().into();
        self.set_path(path, value.clone());
        value
    }

    // ---- Removal ----

    /// Remove a top-level key. Absent keys are a no-op.
    pub fn remove(&self, key: impl Into<Key>) -> &Self {
        self.counters.record_delete();
        self.root().remove(key);
        self
    }

    pub fn remove_path(&self, path: &Path) -> &Self {
        self.counters.record_delete();
        self.root().remove_deep(path);
        self
    }

    /// Alias of [`Cache::remove`].
    pub fn del(&self, key: impl Into<Key>) -> &Self {
        self.remove(key)
    }

    /// Drop all data for this identifier and reset the read, write and
    /// delete counters.
    pub fn flush(&self) -> &Self {
        self.counters.record_flush();
        self.store.flush(&self.id);
        self
    }

    /// Alias of [`Cache::flush`].
    pub fn clear(&self) -> &Self {
        self.flush()
    }

    // ---- Inspection ----

    /// Number of top-level keys.
    pub fn size(&self) -> usize {
        self.root().len()
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.id.clone(), self.size())
    }

    /// Plain-tree export of everything stored for this identifier.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.root())
    }

    /// JSON rendering of [`Cache::snapshot`].
    pub fn to_json(&self) -> serde_json::Value {
        self.snapshot().to_json()
    }
}

impl fmt::Display for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.config.label, self.stats())
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("id", &self.id)
            .field("keys", &self.size())
            .finish()
    }
}
