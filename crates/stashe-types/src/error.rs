use thiserror::Error;

/// Errors from constructing foundation types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A path must contain at least one key.
    #[error("path must contain at least one key")]
    EmptyPath,

    /// A dotted path contained an empty segment, e.g. `a..b`.
    #[error("empty segment in path '{input}'")]
    EmptySegment { input: String },
}
