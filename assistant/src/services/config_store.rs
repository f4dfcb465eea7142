//! Layered, file-backed configuration store
//!
//! Each group lives in `<config_dir>/<group>.json`. On load the compiled-in
//! defaults are deep-merged *under* the on-disk document, so every default key
//! is always present while user overrides and extra keys survive. Writes go
//! through `storage::write_atomically`; concurrent writers are not coordinated
//! and the last one wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::fs;

use shared::{component_debug, component_warn, Component, ConfigGroup};
use crate::error::{AssistantError, AssistantResult};
use crate::services::config_defaults::default_group;
use crate::services::storage::write_atomically;
use crate::settings::Settings;

/// Live configuration for all groups
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_dir: PathBuf,
    groups: BTreeMap<ConfigGroup, Value>,
}

impl ConfigStore {
    /// Load every group from `config_dir`, creating missing documents
    pub async fn open(config_dir: impl Into<PathBuf>) -> AssistantResult<Self> {
        let mut store = Self {
            config_dir: config_dir.into(),
            groups: BTreeMap::new(),
        };

        for group in ConfigGroup::ALL {
            let value = store.load_or_create(group).await?;
            store.groups.insert(group, value);
        }

        component_debug!(Component::Config, "Loaded {} configuration groups from {}", store.groups.len(), store.config_dir.display());
        Ok(store)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the document backing `group`
    pub fn group_path(&self, group: ConfigGroup) -> PathBuf {
        self.config_dir.join(group.file_name())
    }

    async fn load_or_create(&self, group: ConfigGroup) -> AssistantResult<Value> {
        let path = self.group_path(group);
        let mut merged = default_group(group);

        match fs::read(&path).await {
            Ok(content) => match serde_json::from_slice::<Value>(&content) {
                Ok(on_disk @ Value::Object(_)) => deep_merge(&mut merged, &on_disk),
                Ok(_) => {
                    component_warn!(Component::Config, "{} is not a JSON object, restoring defaults", path.display());
                }
                Err(e) => {
                    component_warn!(Component::Config, "{} is malformed ({}), restoring defaults", path.display(), e);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                component_debug!(Component::Config, "Creating {} with defaults", path.display());
            }
            Err(e) => return Err(e.into()),
        }

        self.write_group(group, &merged).await?;
        Ok(merged)
    }

    async fn write_group(&self, group: ConfigGroup, value: &Value) -> AssistantResult<()> {
        let content = serde_json::to_string_pretty(value)?;
        write_atomically(&self.group_path(group), content.as_bytes()).await?;
        Ok(())
    }

    /// Persist the current value of `group`
    pub async fn save(&self, group: ConfigGroup) -> AssistantResult<()> {
        match self.groups.get(&group) {
            Some(value) => self.write_group(group, value).await,
            None => Ok(()),
        }
    }

    /// Whole group when `path` is `None`, otherwise the value at the dotted path
    pub fn get(&self, group: ConfigGroup, path: Option<&str>) -> Option<Value> {
        let root = self.groups.get(&group)?;
        match path {
            None => Some(root.clone()),
            Some(path) => lookup_path(root, path).cloned(),
        }
    }

    /// Like `get`, substituting `default` when the path does not resolve
    pub fn get_or(&self, group: ConfigGroup, path: Option<&str>, default: Value) -> Value {
        self.get(group, path).unwrap_or(default)
    }

    /// Typed lookup; unresolved paths and type mismatches yield `default`
    pub fn get_as<T: DeserializeOwned>(&self, group: ConfigGroup, path: Option<&str>, default: T) -> T {
        match self.get(group, path) {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                component_warn!(Component::Config, "{}.{} has an unexpected type: {}", group, path.unwrap_or(""), e);
                default
            }),
            None => default,
        }
    }

    /// Lookup by group name; unknown names log a warning and return `default`
    pub fn get_named(&self, group_name: &str, path: Option<&str>, default: Value) -> Value {
        match ConfigGroup::from_name(group_name) {
            Ok(group) => self.get_or(group, path, default),
            Err(e) => {
                component_warn!(Component::Config, "{}", e);
                default
            }
        }
    }

    /// Set the value at a dotted path, creating intermediate mappings
    pub async fn set(&mut self, group: ConfigGroup, path: &str, value: Value, persist: bool) -> AssistantResult<()> {
        if path.is_empty() {
            component_warn!(Component::Config, "Ignoring set on {} with an empty path", group);
            return Ok(());
        }

        let root = self.groups.entry(group).or_insert_with(|| default_group(group));
        set_path(root, path, value);

        if persist {
            self.save(group).await?;
        }
        Ok(())
    }

    /// `set` addressed by group name; unknown names are a logged no-op
    pub async fn set_named(&mut self, group_name: &str, path: &str, value: Value, persist: bool) -> AssistantResult<()> {
        match ConfigGroup::from_name(group_name) {
            Ok(group) => self.set(group, path, value, persist).await,
            Err(e) => {
                component_warn!(Component::Config, "{}", e);
                Ok(())
            }
        }
    }

    /// Deep-merge a partial mapping into a group
    pub async fn update(&mut self, group: ConfigGroup, partial: Value, persist: bool) -> AssistantResult<()> {
        if !partial.is_object() {
            component_warn!(Component::Config, "Ignoring non-object update for {}", group);
            return Ok(());
        }

        let root = self.groups.entry(group).or_insert_with(|| default_group(group));
        deep_merge(root, &partial);

        if persist {
            self.save(group).await?;
        }
        Ok(())
    }

    /// Re-read one group (or all) from disk
    pub async fn reload(&mut self, group: Option<ConfigGroup>) -> AssistantResult<()> {
        for group in selected(group) {
            let value = self.load_or_create(group).await?;
            self.groups.insert(group, value);
        }
        Ok(())
    }

    /// Restore compiled-in defaults for one group (or all) and persist them
    pub async fn reset(&mut self, group: Option<ConfigGroup>) -> AssistantResult<()> {
        for group in selected(group) {
            self.groups.insert(group, default_group(group));
            self.save(group).await?;
        }
        Ok(())
    }

    /// Write one group, or an object keyed by group name, to `path`
    pub async fn export(&self, path: &Path, group: Option<ConfigGroup>) -> AssistantResult<()> {
        let document = match group {
            Some(group) => self.get(group, None).unwrap_or_else(|| default_group(group)),
            None => {
                let all: Map<String, Value> = self
                    .groups
                    .iter()
                    .map(|(group, value)| (group.as_str().to_string(), value.clone()))
                    .collect();
                Value::Object(all)
            }
        };

        let content = serde_json::to_string_pretty(&document)?;
        write_atomically(path, content.as_bytes()).await?;
        Ok(())
    }

    /// Merge a previously exported document into the live configuration
    ///
    /// With a group, the file holds that group's mapping; without one it holds
    /// an object keyed by group name, where unknown names are skipped.
    pub async fn import(&mut self, path: &Path, group: Option<ConfigGroup>) -> AssistantResult<()> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            AssistantError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let document: Value = serde_json::from_str(&content).map_err(|e| {
            AssistantError::config(format!("{} is not valid JSON: {}", path.display(), e))
        })?;
        let Value::Object(entries) = document else {
            return Err(AssistantError::config(format!("{} does not hold a JSON object", path.display())));
        };

        match group {
            Some(group) => self.update(group, Value::Object(entries), true).await?,
            None => {
                for (name, value) in entries {
                    match ConfigGroup::from_name(&name) {
                        Ok(group) => self.update(group, value, true).await?,
                        Err(e) => component_warn!(Component::Config, "Skipping import entry: {}", e),
                    }
                }
            }
        }
        Ok(())
    }

    /// Check that every default key exists in the live configuration
    pub fn validate(&self, group: Option<ConfigGroup>) -> BTreeMap<ConfigGroup, bool> {
        selected(group)
            .into_iter()
            .map(|group| {
                let valid = self
                    .groups
                    .get(&group)
                    .map(|live| contains_all_keys(&default_group(group), live))
                    .unwrap_or(false);
                (group, valid)
            })
            .collect()
    }

    /// Immutable typed view of the current configuration
    pub fn snapshot(&self) -> Settings {
        Settings::from_documents(&self.groups)
    }
}

fn selected(group: Option<ConfigGroup>) -> Vec<ConfigGroup> {
    match group {
        Some(group) => vec![group],
        None => ConfigGroup::ALL.to_vec(),
    }
}

/// Walk a dotted path; any missing segment or non-mapping intermediate yields `None`
pub(crate) fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |current, segment| current.as_object()?.get(segment))
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced by an object"),
    }
}

fn set_path(root: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        current = ensure_object(current)
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    ensure_object(current).insert(last.to_string(), value);
}

/// Merge `overlay` into `base`: mappings recurse, anything else replaces
pub(crate) fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) if existing.is_object() && value.is_object() => deep_merge(existing, value),
                    _ => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Whether every key of `defaults` exists in `live`, recursively
pub(crate) fn contains_all_keys(defaults: &Value, live: &Value) -> bool {
    match defaults {
        Value::Object(default_map) => match live.as_object() {
            Some(live_map) => default_map.iter().all(|(key, default_value)| {
                live_map
                    .get(key)
                    .map_or(false, |live_value| contains_all_keys(default_value, live_value))
            }),
            None => false,
        },
        _ => true,
    }
}
