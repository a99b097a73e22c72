//! Domain-level error types.

use thiserror::Error;

/// Domain errors - caller-side precondition violations, or a store failure
/// passed through unmodified.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The operation needs a persisted identity, but the instance is not ready.
    #[error("post has no persisted identity yet")]
    NotReady,

    /// A required field was not set before the operation.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Store failure. No retry logic lives at this layer.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Store-level errors reported by the persistence adapter.
///
/// "No matching row" is not an error: fetches report it as an empty result
/// set, and loads leave the instance unready.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connection(String),

    #[error("query execution failed: {0}")]
    Query(String),
}
