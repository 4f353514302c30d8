//! Cache instances for stashe.
//!
//! A [`Cache`] is a handle bound to one [`Identifier`] in a shared
//! [`Store`]. It forwards every data operation to the store segment for its
//! identifier and keeps its own usage counters.
//!
//! # Modules
//!
//! - [`cache`] — The [`Cache`] handle
//! - [`config`] — [`CacheConfig`] and TOML loading
//! - [`stats`] — [`CacheStats`] snapshots of the usage counters
//! - [`snapshot`] — [`Snapshot`], the plain-tree export of a cache's data
//! - [`error`] — Error types for configuration loading
//!
//! # Example
//!
//! ```
//! use stashe_cache::Cache;
//! use stashe_types::path;
//!
//! let cache = Cache::create(None);
//! cache.set("greeting", "hello").set_path(&path!["users", "alice"], 30);
//!
//! assert_eq!(cache.get_path(&path!["users", "alice"]).and_then(|v| v.as_f64()), Some(30.0));
//! assert_eq!(cache.size(), 2);
//! assert_eq!(cache.stats().writes, 2);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod stats;

pub use cache::Cache;
pub use config::CacheConfig;
pub use error::{ConfigError, ConfigResult};
pub use snapshot::Snapshot;
pub use stats::CacheStats;

pub use stashe_store::{Node, Store, Value};
pub use stashe_types::{Identifier, Key, Path};
