//! Foundation types for stashe.
//!
//! Every other stashe crate depends on `stashe-types`. The types here carry
//! no storage behavior; they only name things.
//!
//! # Key Types
//!
//! - [`Identifier`] — Names one cache instance's data segment
//! - [`Key`] — A single user key (string or number)
//! - [`Path`] — A non-empty ordered sequence of keys addressing nested data
//! - [`TypeError`] — Failures constructing the above

pub mod error;
pub mod identifier;
pub mod key;
pub mod path;

pub use error::TypeError;
pub use identifier::Identifier;
pub use key::Key;
pub use path::Path;
