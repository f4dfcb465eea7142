//! Assistant trait definitions for dependency injection

use std::collections::HashMap;
use std::path::Path;
use async_trait::async_trait;

use shared::CompletionFailure;
use crate::error::AssistantResult;
use crate::types::{InteractionRecord, SimilarInteraction};

/// External text-completion collaborator
///
/// Receives the raw request text plus any caller-supplied context entries and
/// returns generated text. Any time bound is the collaborator's own responsibility.
#[mockall::automock]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Short name reported in result metadata
    fn name(&self) -> String;

    /// Generate text for the request, producing at most `max_new_tokens`
    async fn complete(
        &self,
        request: &str,
        context: &HashMap<String, String>,
        max_new_tokens: u32,
    ) -> Result<String, CompletionFailure>;
}

/// Persistent record of past interactions
#[mockall::automock]
#[async_trait]
pub trait InteractionLog: Send + Sync {
    /// Store an interaction and return its content-derived id
    async fn store(&self, input: &str, output: &str, feedback: Option<String>) -> AssistantResult<String>;

    /// Records whose input is at least `threshold` similar to `input`, best first
    async fn find_similar(&self, input: &str, threshold: f64) -> AssistantResult<Vec<SimilarInteraction>>;

    /// Load a single record by id
    async fn load(&self, id: &str) -> AssistantResult<Option<InteractionRecord>>;

    /// Number of stored records
    async fn count(&self) -> AssistantResult<usize>;
}

/// Asks whether a generated file may be written
#[mockall::automock]
pub trait OverwriteConsent: Send + Sync {
    /// `exists` is true when the write would replace a file
    fn confirm(&self, path: &Path, exists: bool) -> bool;
}
