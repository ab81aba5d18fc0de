//! Error types for slot generation.

use thiserror::Error;

/// Failure reported by a window or booking source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing store could not be reached.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The store was reachable but the query failed.
    #[error("query failed: {0}")]
    Query(String),
}

/// Errors surfaced by [`crate::SlotGenerator::generate_slots`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// Malformed or missing date / offering identifier. Never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A window or booking fetch failed. The caller may retry the whole call.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The caller cancelled, or the fetch deadline expired.
    #[error("Slot generation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, SlotError>;
