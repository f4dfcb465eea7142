//! Assistant error types

use thiserror::Error;
use shared::SharedError;

/// Result type for assistant operations
pub type AssistantResult<T> = Result<T, AssistantError>;

/// Assistant error types
///
/// Generation failures never appear here; the engine folds them into a
/// failed `GenerationResult`. What remains are caller and storage errors.
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Interaction id {id} already holds a different input")]
    InteractionCollision { id: String },

    #[error("Output path rejected: {path} - {reason}")]
    PathRejected { path: String, reason: String },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AssistantError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn rejected(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PathRejected { path: path.into(), reason: reason.into() }
    }
}
