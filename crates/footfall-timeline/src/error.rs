//! Error types for timeline operations.

use footfall_models::SessionId;
use thiserror::Error;

/// Result type for timeline operations.
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Errors that can occur during timeline access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    /// Index is negative or past the end of the timeline.
    #[error("index {index} out of range for timeline of length {len}")]
    OutOfRange { index: i64, len: usize },

    /// No session with the given id exists in the store.
    #[error("unknown session: {0}")]
    SessionNotFound(SessionId),

    /// The store lock was poisoned by a panicking writer.
    #[error("timeline store lock poisoned")]
    LockPoisoned,
}
