//! Executes parsed script ops against one shared store.

use std::collections::BTreeMap;
use std::rc::Rc;

use stashe_cache::{Cache, CacheConfig, CacheStats, Snapshot};
use stashe_store::{Store, Value};
use stashe_types::Identifier;
use tracing::debug;

use crate::script::{to_value, Op};

/// What an op produced, ready to be printed.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Switched(Identifier),
    Stored,
    Removed,
    Flushed,
    Found(Option<Value>),
    Answer(bool),
    Size(usize),
    Stats(CacheStats),
    Dump(Snapshot),
}

/// A set of caches on one store, with one of them selected.
pub struct Session {
    store: Rc<Store>,
    config: CacheConfig,
    caches: BTreeMap<Identifier, Cache>,
    current: Identifier,
}

impl Session {
    /// Start with a single cache under the next automatic identifier.
    pub fn new(config: CacheConfig) -> Self {
        let store = Store::shared();
        let first = Cache::with_config(Rc::clone(&store), None, config.clone());
        let current = first.id().clone();
        let mut caches = BTreeMap::new();
        caches.insert(current.clone(), first);
        Self {
            store,
            config,
            caches,
            current,
        }
    }

    pub fn current(&self) -> &Identifier {
        &self.current
    }

    fn cache(&mut self) -> &Cache {
        let store = &self.store;
        let config = &self.config;
        self.caches
            .entry(self.current.clone())
            .or_insert_with_key(|id| Cache::with_config(Rc::clone(store), Some(id.clone()), config.clone()))
    }

    pub fn execute(&mut self, op: &Op) -> Outcome {
        debug!(?op, current = %self.current, "executing");
        match op {
            Op::Use(id) => {
                self.current = id.clone();
                self.cache();
                Outcome::Switched(id.clone())
            }
            Op::Set(path, json) => {
                self.cache().set_path(path, to_value(json));
                Outcome::Stored
            }
            Op::Get(path) => Outcome::Found(self.cache().get_path(path)),
            Op::Del(path) => {
                self.cache().remove_path(path);
                Outcome::Removed
            }
            Op::Has(path) => Outcome::Answer(self.cache().has_path(path)),
            Op::Exists(path) => Outcome::Answer(self.cache().exists_path(path)),
            Op::Size => Outcome::Size(self.cache().size()),
            Op::Stats => Outcome::Stats(self.cache().stats()),
            Op::Flush => {
                self.cache().flush();
                Outcome::Flushed
            }
            Op::Dump => Outcome::Dump(self.cache().snapshot()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;
    use serde_json::json;

    fn run(script: &str) -> (Session, Vec<Outcome>) {
        let mut session = Session::new(CacheConfig::default());
        let outcomes = parse_script(script)
            .unwrap()
            .iter()
            .map(|op| session.execute(op))
            .collect();
        (session, outcomes)
    }

    #[test]
    fn set_get_round_trip() {
        let (_, out) = run("set a.b 1\nget a.b\nget a.c");
        assert_eq!(out[1], Outcome::Found(Some(Value::from(1))));
        assert_eq!(out[2], Outcome::Found(None));
    }

    #[test]
    fn use_switches_and_isolates() {
        let (session, out) = run("set k 1\nuse other\nget k\nsize");
        assert_eq!(out[1], Outcome::Switched(Identifier::from("other")));
        assert_eq!(out[2], Outcome::Found(None));
        assert_eq!(out[3], Outcome::Size(0));
        assert_eq!(session.current(), &Identifier::from("other"));
    }

    #[test]
    fn switching_back_keeps_counters() {
        let (_, out) = run("use a\nset k 1\nuse b\nuse a\nstats");
        match &out[4] {
            Outcome::Stats(s) => {
                assert_eq!(s.id, Identifier::from("a"));
                assert_eq!(s.writes, 1);
                assert_eq!(s.keys, 1);
            }
            other => panic!("expected stats, got {other:?}"),
        }
    }

    #[test]
    fn has_exists_and_flush() {
        let (_, out) = run("set n null\nhas n\nexists n\nflush\nhas n\ndump");
        assert_eq!(out[1], Outcome::Answer(true));
        assert_eq!(out[2], Outcome::Answer(false));
        assert_eq!(out[3], Outcome::Flushed);
        assert_eq!(out[4], Outcome::Answer(false));
        match &out[5] {
            Outcome::Dump(snap) => assert!(snap.is_empty()),
            other => panic!("expected dump, got {other:?}"),
        }
    }

    #[test]
    fn dump_reflects_tree() {
        let (_, out) = run("set u.alice {\"age\": 30}\ndel missing\ndump");
        assert_eq!(out[1], Outcome::Removed);
        match &out[2] {
            Outcome::Dump(snap) => {
                assert_eq!(snap.to_json(), json!({ "u": { "alice": { "age": 30.0 } } }));
            }
            other => panic!("expected dump, got {other:?}"),
        }
    }
}
