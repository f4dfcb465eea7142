//! Assistant data types

use std::collections::HashMap;
use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use shared::{Category, Priority, RequestId};

/// Confidence attached to every successful generation
pub const SUCCESS_CONFIDENCE: f64 = 0.8;

/// A single code generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub id: RequestId,
    pub input: String,
    /// Requested output category; classified from the input when absent
    pub category: Option<Category>,
    pub extra_context: HashMap<String, String>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

impl GenerationRequest {
    /// Create a normal-priority request for the given input
    pub fn new(input: impl Into<String>) -> Self {
        let input = input.into();
        let created_at = Utc::now();
        Self {
            id: RequestId::derive(&input, created_at),
            input,
            category: None,
            extra_context: HashMap::new(),
            priority: Priority::Normal,
            created_at,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_context.insert(key.into(), value.into());
        self
    }

    /// Override the derived identifier
    pub fn with_id(mut self, id: RequestId) -> Self {
        self.id = id;
        self
    }
}

/// Descriptive data attached to a generation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub category: Category,
    pub used_completion: bool,
    /// Name of the collaborator that produced the text, if one was used
    pub collaborator: Option<String>,
    pub quality_score: Option<f64>,
    pub suggestions: Vec<String>,
}

/// Outcome of a dispatched request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub request_id: RequestId,
    pub success: bool,
    pub output: String,
    pub duration: Duration,
    pub confidence: f64,
    pub error: Option<String>,
    pub metadata: GenerationMetadata,
}

/// One persisted request/response pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: String,
    pub timestamp: String,
    pub input: String,
    pub output: String,
    pub feedback: Option<String>,
    pub session: String,
}

/// A stored interaction with its similarity to a query
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarInteraction {
    pub record: InteractionRecord,
    pub similarity: f64,
}

/// Engine performance statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatistics {
    pub tasks_completed: u64,
    pub successful_tasks: u64,
    pub total_duration_ms: f64,
    pub average_duration_ms: f64,
    pub success_rate: f64,
    pub active_tasks: usize,
    /// Results currently retained in the bounded history
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub has_completion: bool,
}

impl Default for EngineStatistics {
    fn default() -> Self {
        Self {
            tasks_completed: 0,
            successful_tasks: 0,
            total_duration_ms: 0.0,
            average_duration_ms: 0.0,
            success_rate: 0.0,
            active_tasks: 0,
            completed_tasks: 0,
            pending_tasks: 0,
            has_completion: false,
        }
    }
}
