//! Core shared types and identifiers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::errors::{SharedError, SharedResult};

/// Output category guiding which template or context is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Block,
    Item,
    Entity,
    General,
}

impl Category {
    /// All categories in enumeration order (classifier tie-break order)
    pub const ALL: [Category; 4] = [
        Category::Block,
        Category::Item,
        Category::Entity,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Block => "block",
            Category::Item => "item",
            Category::Entity => "entity",
            Category::General => "general",
        }
    }

    pub fn from_name(s: &str) -> SharedResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "block" => Ok(Category::Block),
            "item" => Ok(Category::Item),
            "entity" => Ok(Category::Entity),
            "general" => Ok(Category::General),
            _ => Err(SharedError::UnknownCategory { input: s.to_string() }),
        }
    }

    /// Class name suffix appended to derived identifiers
    pub fn class_suffix(&self) -> Option<&'static str> {
        match self {
            Category::Block => Some("Block"),
            Category::Item => Some("Item"),
            Category::Entity => Some("Entity"),
            Category::General => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low = 1,
    Normal = 2,
    High = 3,
    Critical = 4,
}

impl Priority {
    pub fn from_name(s: &str) -> SharedResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(SharedError::UnknownPriority { input: s.to_string() }),
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

/// Identifier of a generation request
///
/// Derived from the submission time plus a short hash of the input, so two
/// identical inputs submitted within the same second share an identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    pub fn derive(input: &str, at: DateTime<Utc>) -> Self {
        let digest = Sha256::digest(input.as_bytes());
        let short = u16::from_be_bytes([digest[0], digest[1]]) % 10000;
        Self(format!("gen_{}_{:04}", at.timestamp(), short))
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named configuration groups, one JSON document each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigGroup {
    Main,
    Performance,
    Security,
    Learning,
    Preferences,
}

impl ConfigGroup {
    pub const ALL: [ConfigGroup; 5] = [
        ConfigGroup::Main,
        ConfigGroup::Performance,
        ConfigGroup::Security,
        ConfigGroup::Learning,
        ConfigGroup::Preferences,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigGroup::Main => "main",
            ConfigGroup::Performance => "performance",
            ConfigGroup::Security => "security",
            ConfigGroup::Learning => "learning",
            ConfigGroup::Preferences => "preferences",
        }
    }

    pub fn from_name(s: &str) -> SharedResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "main" => Ok(ConfigGroup::Main),
            "performance" => Ok(ConfigGroup::Performance),
            "security" => Ok(ConfigGroup::Security),
            "learning" => Ok(ConfigGroup::Learning),
            "preferences" | "user_preferences" => Ok(ConfigGroup::Preferences),
            _ => Err(SharedError::UnknownConfigGroup { input: s.to_string() }),
        }
    }

    /// File name of the group's document inside the config directory
    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for ConfigGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
