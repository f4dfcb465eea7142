//! Shared error types for the modforge assistant

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Unknown category: {input}")]
    UnknownCategory { input: String },

    #[error("Unknown configuration group: {input}")]
    UnknownConfigGroup { input: String },

    #[error("Unknown priority: {input}")]
    UnknownPriority { input: String },
}

pub type SharedResult<T> = Result<T, SharedError>;

/// Failure reasons reported by an external text-completion collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionFailure {
    /// Transport-level failure (connection refused, DNS, reset)
    #[error("network error: {0}")]
    NetworkError(String),

    /// The collaborator answered with a non-success status
    #[error("server error: {0}")]
    ServerError(String),

    /// The collaborator answered but the payload was unusable
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The collaborator did not answer within its own time bound
    #[error("request timed out")]
    Timeout,

    /// The collaborator is not loaded or refuses work
    #[error("model unavailable: {0}")]
    Unavailable(String),
}
