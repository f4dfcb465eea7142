//! Writes generated source files under the configured file policy

use std::path::{Component as PathComponent, Path, PathBuf};
use tokio::fs;

use shared::{component_debug, component_info, component_warn, Component};
use crate::error::{AssistantError, AssistantResult};
use crate::settings::FilePolicy;
use crate::traits::OverwriteConsent;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Policy-checked writer for generated files
///
/// Relative targets and policy directories are resolved against `root`.
/// In safe mode with confirmation enabled, every write first asks the
/// attached consent hook.
pub struct OutputWriter {
    root: PathBuf,
    policy: FilePolicy,
    safe_mode: bool,
    confirm_writes: bool,
    consent: Option<Box<dyn OverwriteConsent>>,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>, policy: FilePolicy, safe_mode: bool) -> Self {
        Self {
            root: root.into(),
            policy,
            safe_mode,
            confirm_writes: false,
            consent: None,
        }
    }

    /// Ask `consent` before each write while `confirm_writes` and safe mode hold
    pub fn with_consent(mut self, consent: Box<dyn OverwriteConsent>, confirm_writes: bool) -> Self {
        self.consent = Some(consent);
        self.confirm_writes = confirm_writes;
        self
    }

    /// Writer rooted at the current working directory
    pub fn in_current_dir(policy: FilePolicy, safe_mode: bool) -> AssistantResult<Self> {
        Ok(Self::new(std::env::current_dir()?, policy, safe_mode))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        normalize(&self.root.join(path))
    }

    /// Check a target path against the policy without writing anything
    pub fn validate(&self, path: &Path) -> AssistantResult<PathBuf> {
        let resolved = self.resolve(path);
        if !self.safe_mode {
            return Ok(resolved);
        }

        let display = path.display().to_string();

        if let Some(blocked) = self
            .policy
            .blocked_directories
            .iter()
            .find(|dir| resolved.starts_with(self.resolve(dir)))
        {
            return Err(AssistantError::rejected(display, format!("inside blocked directory {}", blocked.display())));
        }

        let allowed = self
            .policy
            .allowed_directories
            .iter()
            .any(|dir| resolved.starts_with(self.resolve(dir)));
        if !allowed {
            return Err(AssistantError::rejected(display, "not inside an allowed directory"));
        }

        let extension = resolved
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        if !self.policy.allowed_extensions.iter().any(|allowed| *allowed == extension) {
            return Err(AssistantError::rejected(display, format!("extension '{}' is not allowed", extension)));
        }

        Ok(resolved)
    }

    /// Write `content` to `path`, backing up any existing file first
    ///
    /// Returns the resolved path that was written, or `None` when the
    /// consent hook declined.
    pub async fn write(&self, path: &Path, content: &str) -> AssistantResult<Option<PathBuf>> {
        let resolved = self.validate(path)?;

        let limit = self.policy.max_file_size_mb.saturating_mul(BYTES_PER_MB);
        if content.len() as u64 > limit {
            return Err(AssistantError::rejected(
                path.display().to_string(),
                format!("{} bytes exceeds the {} MB limit", content.len(), self.policy.max_file_size_mb),
            ));
        }

        let exists = fs::try_exists(&resolved).await?;
        if let Some(consent) = self.consent.as_ref().filter(|_| self.safe_mode && self.confirm_writes) {
            if !consent.confirm(&resolved, exists) {
                component_warn!(Component::Output, "Write to {} declined", resolved.display());
                return Ok(None);
            }
        }

        if self.policy.backup_before_overwrite && exists {
            let backup = backup_path(&resolved);
            fs::copy(&resolved, &backup).await?;
            component_debug!(Component::Output, "Backed up {} to {}", resolved.display(), backup.display());
        }

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&resolved, content).await?;

        component_info!(Component::Output, "Wrote {}", resolved.display());
        Ok(Some(resolved))
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Lexically resolve `.` and `..` so a target cannot climb out of a directory
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            PathComponent::CurDir => {}
            PathComponent::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
