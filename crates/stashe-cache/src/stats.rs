use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Serialize};
use stashe_types::Identifier;

/// Point-in-time view of a cache's usage counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub id: Identifier,
    /// Top-level keys currently stored.
    pub keys: usize,
    pub flushes: u64,
    pub reads: u64,
    pub writes: u64,
    pub deletes: u64,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id: {}, keys: {}, flushes: {}, reads: {}, writes: {}, deletes: {}",
            self.id, self.keys, self.flushes, self.reads, self.writes, self.deletes
        )
    }
}

/// Live counters owned by a cache.
///
/// `reads`, `writes` and `deletes` reset on flush; `flushes` never does.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    reads: Cell<u64>,
    writes: Cell<u64>,
    deletes: Cell<u64>,
    flushes: Cell<u64>,
}

impl Counters {
    pub(crate) fn record_read(&self) {
        self.reads.set(self.reads.get() + 1);
    }

    pub(crate) fn record_write(&self) {
        self.writes.set(self.writes.get() + 1);
    }

    pub(crate) fn record_delete(&self) {
        self.deletes.set(self.deletes.get() + 1);
    }

    pub(crate) fn record_flush(&self) {
        self.flushes.set(self.flushes.get() + 1);
        self.reads.set(0);
        self.writes.set(0);
        self.deletes.set(0);
    }

    pub(crate) fn snapshot(&self, id: Identifier, keys: usize) -> CacheStats {
        CacheStats {
            id,
            keys,
            flushes: self.flushes.get(),
            reads: self.reads.get(),
            writes: self.writes.get(),
            deletes: self.deletes.get(),
        }
    }
}
