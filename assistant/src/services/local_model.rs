//! HTTP completion client for a locally served code model
//!
//! Talks to a llama.cpp-style server: `POST {endpoint}/completion` with the
//! prompt and sampling parameters, reading the generated text from `content`.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use shared::{component_debug, component_warn, Component, CompletionFailure};
use crate::core::prompt::{build_prompt, compress_context, extract_generated_code};
use crate::core::{classify, ContextLibrary};
use crate::error::{AssistantError, AssistantResult};
use crate::settings::{GenerationSettings, ModelSettings};
use crate::traits::CompletionClient;

/// Used when no context file is available
pub const BASIC_CONTEXT: &str = "// Basic Minecraft context";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    repeat_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}

/// Read and compress the base context file, falling back to a stub
pub async fn load_base_context(path: &Path, limit: usize) -> String {
    match fs::read_to_string(path).await {
        Ok(content) => compress_context(&content, limit),
        Err(e) => {
            component_warn!(Component::Model, "No context file at {} ({}), using basic context", path.display(), e);
            BASIC_CONTEXT.to_string()
        }
    }
}

pub struct LocalModelClient {
    client: reqwest::Client,
    endpoint: String,
    base_context: String,
    library: ContextLibrary,
    generation: GenerationSettings,
    max_context_chars: usize,
}

impl LocalModelClient {
    pub fn new(endpoint: impl Into<String>, settings: &ModelSettings, base_context: String) -> AssistantResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs.max(1)))
            .build()
            .map_err(|e| AssistantError::config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            base_context,
            library: ContextLibrary::new(),
            generation: settings.generation.clone(),
            max_context_chars: settings.max_context_chars,
        })
    }

    /// Client for the configured endpoint, loading the base context file
    pub async fn from_settings(settings: &ModelSettings) -> AssistantResult<Option<Self>> {
        let Some(endpoint) = settings.endpoint.as_deref() else {
            return Ok(None);
        };
        let base_context = load_base_context(&settings.context_file, settings.max_context_chars).await;
        Self::new(endpoint, settings, base_context).map(Some)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Full prompt for a request: base context, the category snippet, then
    /// caller-supplied entries as `key: value` lines in key order
    pub fn prompt_for(&self, request: &str, extra: &HashMap<String, String>) -> String {
        let snippet = self.library.context_for(classify(request), Some(self.max_context_chars));
        let mut context = compress_context(&format!("{}\n{}", self.base_context, snippet), self.max_context_chars);

        let mut entries: Vec<_> = extra.iter().collect();
        entries.sort();
        for (key, value) in entries {
            context.push_str(&format!("\n{}: {}", key, value));
        }
        build_prompt(&context, request)
    }

    /// Sampling temperature sent to the server; greedy when sampling is off
    fn temperature(&self) -> f32 {
        if self.generation.do_sample {
            self.generation.temperature
        } else {
            0.0
        }
    }
}

fn transport_failure(e: reqwest::Error) -> CompletionFailure {
    if e.is_timeout() {
        CompletionFailure::Timeout
    } else if e.is_connect() {
        CompletionFailure::Unavailable(e.to_string())
    } else {
        CompletionFailure::NetworkError(e.to_string())
    }
}

#[async_trait]
impl CompletionClient for LocalModelClient {
    fn name(&self) -> String {
        "local-model".to_string()
    }

    async fn complete(
        &self,
        request: &str,
        context: &HashMap<String, String>,
        max_new_tokens: u32,
    ) -> Result<String, CompletionFailure> {
        let prompt = self.prompt_for(request, context);
        let body = CompletionRequest {
            prompt: &prompt,
            n_predict: max_new_tokens,
            temperature: self.temperature(),
            top_p: self.generation.top_p,
            top_k: self.generation.top_k,
            repeat_penalty: self.generation.repetition_penalty,
        };

        component_debug!(Component::Model, "Requesting completion ({} prompt chars)", prompt.len());
        let response = self
            .client
            .post(format!("{}/completion", self.endpoint))
            .json(&body)
            .send()
            .await
            .map_err(transport_failure)?;

        if !response.status().is_success() {
            return match response.status().as_u16() {
                503 => Err(CompletionFailure::Unavailable(response.status().to_string())),
                _ => Err(CompletionFailure::ServerError(response.status().to_string())),
            };
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CompletionFailure::Timeout
            } else {
                CompletionFailure::InvalidResponse(format!("failed to parse response: {}", e))
            }
        })?;

        let code = extract_generated_code(&parsed.content);
        if code.is_empty() {
            return Err(CompletionFailure::InvalidResponse("empty completion".to_string()));
        }
        Ok(code)
    }
}
