//! File-backed interaction log
//!
//! One pretty-printed JSON document per record, named after the first twelve
//! hex digits of the SHA-256 of the input. Storing the same input again
//! replaces the previous record.

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use chrono::Local;
use sha2::{Digest, Sha256};
use similar::TextDiff;
use tokio::fs;

use shared::{component_debug, component_warn, Component};
use crate::error::{AssistantError, AssistantResult};
use crate::services::storage::write_atomically;
use crate::traits::InteractionLog;
use crate::types::{InteractionRecord, SimilarInteraction};

const ID_HEX_DIGITS: usize = 12;
const RECORD_EXTENSION: &str = "json";

/// Content-derived record id for an input
pub fn interaction_id(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut id: String = digest.iter().map(|byte| format!("{:02x}", byte)).collect();
    id.truncate(ID_HEX_DIGITS);
    id
}

/// Normalized character similarity in `[0, 1]`, identical strings score 1.0
///
/// Arguments are put in a canonical order first so the score is symmetric.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    f64::from(TextDiff::from_chars(first, second).ratio())
}

/// Interaction log storing records under a memory directory
pub struct RealInteractionLog {
    memory_dir: PathBuf,
    session: String,
    max_entries: usize,
}

impl RealInteractionLog {
    /// Open (creating if needed) the log rooted at `memory_dir`
    pub async fn open(memory_dir: impl Into<PathBuf>, max_entries: usize) -> AssistantResult<Self> {
        let memory_dir = memory_dir.into();
        fs::create_dir_all(&memory_dir).await?;

        let session = Local::now().format("%Y%m%d_%H%M%S").to_string();
        component_debug!(Component::Memory, "Interaction log at {} (session {})", memory_dir.display(), session);

        Ok(Self {
            memory_dir,
            session,
            max_entries,
        })
    }

    pub fn memory_dir(&self) -> &Path {
        &self.memory_dir
    }

    /// Session tag written into every record of this process
    pub fn session(&self) -> &str {
        &self.session
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.memory_dir.join(format!("{}.{}", id, RECORD_EXTENSION))
    }

    async fn read_record(path: &Path) -> AssistantResult<InteractionRecord> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn record_paths(&self) -> AssistantResult<Vec<PathBuf>> {
        let mut entries = match fs::read_dir(&self.memory_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == RECORD_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

#[async_trait]
impl InteractionLog for RealInteractionLog {
    async fn store(&self, input: &str, output: &str, feedback: Option<String>) -> AssistantResult<String> {
        let id = interaction_id(input);
        let path = self.record_path(&id);

        if fs::try_exists(&path).await? {
            match Self::read_record(&path).await {
                Ok(existing) if existing.input != input => {
                    return Err(AssistantError::InteractionCollision { id });
                }
                Ok(_) => {}
                Err(e) => {
                    component_warn!(Component::Memory, "Replacing unreadable record {}: {}", path.display(), e);
                }
            }
        }

        let record = InteractionRecord {
            id: id.clone(),
            timestamp: Local::now().to_rfc3339(),
            input: input.to_string(),
            output: output.to_string(),
            feedback,
            session: self.session.clone(),
        };
        let content = serde_json::to_string_pretty(&record)?;
        write_atomically(&path, content.as_bytes()).await?;
        component_debug!(Component::Memory, "Stored interaction {}", id);

        let count = self.count().await?;
        if count > self.max_entries {
            component_warn!(
                Component::Memory,
                "Interaction log holds {} records, above the configured maximum of {}",
                count,
                self.max_entries
            );
        }

        Ok(id)
    }

    async fn find_similar(&self, input: &str, threshold: f64) -> AssistantResult<Vec<SimilarInteraction>> {
        let mut matches = Vec::new();

        for path in self.record_paths().await? {
            let record = match Self::read_record(&path).await {
                Ok(record) => record,
                Err(e) => {
                    component_warn!(Component::Memory, "Skipping unreadable record {}: {}", path.display(), e);
                    continue;
                }
            };

            let score = similarity(input, &record.input);
            if score >= threshold {
                matches.push(SimilarInteraction { record, similarity: score });
            }
        }

        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        Ok(matches)
    }

    async fn load(&self, id: &str) -> AssistantResult<Option<InteractionRecord>> {
        let path = self.record_path(id);
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }
        Self::read_record(&path).await.map(Some)
    }

    async fn count(&self) -> AssistantResult<usize> {
        Ok(self.record_paths().await?.len())
    }
}
