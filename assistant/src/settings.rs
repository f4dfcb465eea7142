//! Typed, immutable view of the configuration handed to components

use std::collections::BTreeMap;
use std::path::PathBuf;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared::ConfigGroup;
use crate::core::DEFAULT_HISTORY_LIMIT;
use crate::services::config_defaults::default_group;
use crate::services::config_store::lookup_path;

/// Sampling parameters forwarded to the completion server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repetition_penalty: f32,
    pub do_sample: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_new_tokens: 256,
            temperature: 0.7,
            top_p: 0.9,
            top_k: 50,
            repetition_penalty: 1.1,
            do_sample: true,
        }
    }
}

/// Where generated files may be written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePolicy {
    pub allowed_directories: Vec<PathBuf>,
    pub blocked_directories: Vec<PathBuf>,
    pub allowed_extensions: Vec<String>,
    pub max_file_size_mb: u64,
    #[serde(rename = "enable_backup_before_overwrite")]
    pub backup_before_overwrite: bool,
}

impl Default for FilePolicy {
    fn default() -> Self {
        Self {
            allowed_directories: vec![PathBuf::from("src/main/java"), PathBuf::from("generated")],
            blocked_directories: vec![PathBuf::from("/etc"), PathBuf::from("/usr"), PathBuf::from("/bin")],
            allowed_extensions: vec![".java".to_string()],
            max_file_size_mb: 5,
            backup_before_overwrite: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    /// Base URL of the completion server; `None` disables the collaborator
    pub endpoint: Option<String>,
    pub context_file: PathBuf,
    pub request_timeout_secs: u64,
    pub max_context_chars: usize,
    pub generation: GenerationSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LearningSettings {
    pub enable_learning: bool,
    pub similarity_threshold: f64,
    pub memory_dir: PathBuf,
    pub max_memory_entries: usize,
}

/// Snapshot of every configuration group at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub safe_mode: bool,
    pub completed_history_limit: usize,
    pub confirm_overwrites: bool,
    pub model: ModelSettings,
    pub file_policy: FilePolicy,
    pub learning: LearningSettings,
}

struct Documents<'a>(&'a BTreeMap<ConfigGroup, Value>);

impl Documents<'_> {
    fn read<T: DeserializeOwned>(&self, group: ConfigGroup, path: &str, default: T) -> T {
        self.0
            .get(&group)
            .and_then(|root| lookup_path(root, path))
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or(default)
    }
}

impl Settings {
    /// Build from raw group documents; missing or mistyped values take defaults
    pub fn from_documents(groups: &BTreeMap<ConfigGroup, Value>) -> Self {
        let docs = Documents(groups);
        let endpoint: String = docs.read(ConfigGroup::Main, "model_endpoint", String::new());

        Self {
            safe_mode: docs.read(ConfigGroup::Main, "safe_mode", true),
            completed_history_limit: docs.read(
                ConfigGroup::Performance,
                "engine.completed_history_limit",
                DEFAULT_HISTORY_LIMIT,
            ),
            confirm_overwrites: docs.read(ConfigGroup::Preferences, "workflow.confirm_overwrites", true),
            model: ModelSettings {
                endpoint: Some(endpoint.trim().to_string()).filter(|e| !e.is_empty()),
                context_file: docs.read(
                    ConfigGroup::Main,
                    "context_file",
                    PathBuf::from("data/minecraft_api/fabric_context.txt"),
                ),
                request_timeout_secs: docs.read(ConfigGroup::Performance, "model_optimization.request_timeout_secs", 120),
                max_context_chars: docs.read(ConfigGroup::Performance, "model_optimization.max_context_chars", 2000),
                generation: docs.read(ConfigGroup::Performance, "generation_settings", GenerationSettings::default()),
            },
            file_policy: docs.read(ConfigGroup::Security, "file_operations", FilePolicy::default()),
            learning: LearningSettings {
                enable_learning: docs.read(ConfigGroup::Learning, "ai_learning.enable_learning", true),
                similarity_threshold: docs.read(ConfigGroup::Learning, "ai_learning.pattern_recognition_threshold", 0.8),
                memory_dir: docs.read(ConfigGroup::Main, "memory_dir", PathBuf::from("data/memory_db")),
                max_memory_entries: docs.read(ConfigGroup::Main, "max_memory_entries", 1000),
            },
        }
    }

    /// Point the completion collaborator at `endpoint`, or disable it with `None`
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.model.endpoint = endpoint.filter(|e| !e.trim().is_empty());
        self
    }

    pub fn with_memory_dir(mut self, memory_dir: impl Into<PathBuf>) -> Self {
        self.learning.memory_dir = memory_dir.into();
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        let groups = ConfigGroup::ALL
            .iter()
            .map(|group| (*group, default_group(*group)))
            .collect();
        Self::from_documents(&groups)
    }
}
