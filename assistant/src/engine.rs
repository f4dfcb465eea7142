//! Request dispatcher with dependency injection
//!
//! Requests are serviced one at a time. A configured completion collaborator
//! produces the text; without one the request is classified and rendered
//! from a template. Generation failures are folded into a failed result.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};

use shared::{component_debug, component_error, component_info, Category, CompletionFailure, Component, RequestId};
use crate::core::{classify, derive_name, quality, render, CompletionHistory, PendingQueue, RunningStats};
use crate::error::AssistantResult;
use crate::settings::Settings;
use crate::traits::{CompletionClient, InteractionLog};
use crate::types::{
    EngineStatistics, GenerationMetadata, GenerationRequest, GenerationResult, SimilarInteraction,
    SUCCESS_CONFIDENCE,
};

/// Mutable engine bookkeeping
#[derive(Debug)]
pub struct EngineState {
    pub active: HashMap<RequestId, GenerationRequest>,
    pub history: CompletionHistory,
    pub stats: RunningStats,
    pub queue: PendingQueue,
}

impl EngineState {
    pub fn new(history_limit: usize) -> Self {
        Self {
            active: HashMap::new(),
            history: CompletionHistory::new(history_limit),
            stats: RunningStats::default(),
            queue: PendingQueue::new(),
        }
    }
}

pub struct Engine<L>
where
    L: InteractionLog,
{
    pub state: Arc<RwLock<EngineState>>,
    settings: Arc<Settings>,
    completion: Option<Box<dyn CompletionClient>>,
    interaction_log: L,
    /// Held for the whole time a request is serviced
    worker: Mutex<()>,
}

impl<L> Engine<L>
where
    L: InteractionLog,
{
    pub fn new(settings: Arc<Settings>, completion: Option<Box<dyn CompletionClient>>, interaction_log: L) -> Self {
        let state = EngineState::new(settings.completed_history_limit);

        Self {
            state: Arc::new(RwLock::new(state)),
            settings,
            completion,
            interaction_log,
            worker: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn interaction_log(&self) -> &L {
        &self.interaction_log
    }

    pub fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    /// Service a request immediately, bypassing the pending queue
    pub async fn dispatch(&self, request: GenerationRequest) -> GenerationResult {
        let _worker = self.worker.lock().await;
        self.service(request).await
    }

    /// Dispatch, then remember successful interactions when learning is enabled
    pub async fn generate(&self, request: GenerationRequest) -> AssistantResult<GenerationResult> {
        let input = request.input.clone();
        let result = self.dispatch(request).await;
        self.remember(&input, &result).await?;
        Ok(result)
    }

    async fn remember(&self, input: &str, result: &GenerationResult) -> AssistantResult<()> {
        if result.success && self.settings.learning.enable_learning {
            let id = self.interaction_log.store(input, &result.output, None).await?;
            component_debug!(Component::Engine, "Remembered interaction {} for {}", id, result.request_id);
        }
        Ok(())
    }

    /// Queue a request for `run_pending`
    pub async fn enqueue(&self, request: GenerationRequest) -> RequestId {
        let id = request.id.clone();
        let mut state = self.state.write().await;
        state.queue.push(request);
        component_debug!(Component::Engine, "Queued {} ({} pending)", id, state.queue.len());
        id
    }

    /// Service queued requests until the queue is empty
    ///
    /// Each pick takes the highest-priority request pending at that moment;
    /// the request being serviced always runs to completion. Successful
    /// results are remembered as in `generate`; a storage failure stops the
    /// run and leaves the rest queued.
    pub async fn run_pending(&self) -> AssistantResult<Vec<GenerationResult>> {
        let _worker = self.worker.lock().await;
        let mut results = Vec::new();

        loop {
            let next = self.state.write().await.queue.pop();
            let Some(request) = next else {
                break;
            };
            let input = request.input.clone();
            let result = self.service(request).await;
            self.remember(&input, &result).await?;
            results.push(result);
        }

        Ok(results)
    }

    async fn service(&self, request: GenerationRequest) -> GenerationResult {
        let started = Instant::now();
        let id = request.id.clone();

        {
            let mut state = self.state.write().await;
            state.active.insert(id.clone(), request.clone());
        }
        component_debug!(Component::Engine, "Servicing {}", id);

        let category = request.category.unwrap_or_else(|| classify(&request.input));
        let outcome = self.produce(&request, category).await;
        let duration = started.elapsed();

        let result = match outcome {
            Ok((output, collaborator)) => GenerationResult {
                request_id: id.clone(),
                success: true,
                duration,
                confidence: SUCCESS_CONFIDENCE,
                error: None,
                metadata: GenerationMetadata {
                    category,
                    used_completion: collaborator.is_some(),
                    collaborator,
                    quality_score: Some(quality::score(&output)),
                    suggestions: quality::suggest(&output, category),
                },
                output,
            },
            Err(failure) => {
                component_error!(Component::Engine, "Request {} failed: {}", id, failure);
                GenerationResult {
                    request_id: id.clone(),
                    success: false,
                    output: String::new(),
                    duration,
                    confidence: 0.0,
                    error: Some(failure.to_string()),
                    metadata: GenerationMetadata {
                        category,
                        used_completion: true,
                        collaborator: self.completion.as_ref().map(|client| client.name()),
                        quality_score: None,
                        suggestions: Vec::new(),
                    },
                }
            }
        };

        {
            let mut state = self.state.write().await;
            state.active.remove(&id);
            state.stats.record(&result);
            state.history.insert(result.clone());
        }

        if result.success {
            component_info!(Component::Engine, "Completed {} as {} in {:?}", id, category, duration);
        }
        result
    }

    async fn produce(
        &self,
        request: &GenerationRequest,
        category: Category,
    ) -> Result<(String, Option<String>), CompletionFailure> {
        match &self.completion {
            Some(client) => {
                let max_new_tokens = self.settings.model.generation.max_new_tokens;
                let output = client
                    .complete(&request.input, &request.extra_context, max_new_tokens)
                    .await?;
                Ok((output, Some(client.name())))
            }
            None => {
                let class_name = derive_name(&request.input, category);
                Ok((render(category, &class_name, &request.input), None))
            }
        }
    }

    /// Past interactions above the configured similarity threshold
    pub async fn find_similar(&self, input: &str) -> AssistantResult<Vec<SimilarInteraction>> {
        self.interaction_log
            .find_similar(input, self.settings.learning.similarity_threshold)
            .await
    }

    pub async fn statistics(&self) -> EngineStatistics {
        let state = self.state.read().await;
        EngineStatistics {
            tasks_completed: state.stats.completed,
            successful_tasks: state.stats.succeeded,
            total_duration_ms: state.stats.total_duration_ms(),
            average_duration_ms: state.stats.average_duration_ms(),
            success_rate: state.stats.success_rate(),
            active_tasks: state.active.len(),
            completed_tasks: state.history.len(),
            pending_tasks: state.queue.len(),
            has_completion: self.completion.is_some(),
        }
    }

    pub async fn is_active(&self, id: &RequestId) -> bool {
        self.state.read().await.active.contains_key(id)
    }

    /// Retained result for `id`, if it has not been evicted
    pub async fn completed_result(&self, id: &RequestId) -> Option<GenerationResult> {
        self.state.read().await.history.get(id).cloned()
    }
}
