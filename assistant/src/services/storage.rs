//! Atomic single-file writes shared by the config store and interaction log

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Write `contents` to `path` via a sibling temp file and a rename
///
/// Readers see either the previous file or the complete new one.
pub async fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let temp_path = temp_path_for(path);
    let result = match write_temp(&temp_path, contents).await {
        Ok(()) => fs::rename(&temp_path, path).await,
        Err(e) => Err(e),
    };

    // Any failure leaves no temp file behind
    if result.is_err() {
        let _ = fs::remove_file(&temp_path).await;
    }
    result
}

async fn write_temp(temp_path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(temp_path).await?;
    file.write_all(contents).await?;
    file.sync_all().await
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");

        write_atomically(&path, b"first").await.unwrap();
        write_atomically(&path, b"second").await.unwrap();

        assert_eq!(fs::read_to_string(&path).await.unwrap(), "second");
        assert!(!dir.path().join("nested").join("doc.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the target makes the final rename fail
        let path = dir.path().join("doc.json");
        fs::create_dir_all(path.join("occupied")).await.unwrap();

        assert!(write_atomically(&path, b"contents").await.is_err());

        assert!(!dir.path().join("doc.json.tmp").exists());
        assert!(path.join("occupied").is_dir());
    }
}
