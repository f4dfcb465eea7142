//! Tests for OutputWriter

use std::path::Path;
use tempfile::TempDir;
use tokio::fs;

use crate::error::AssistantError;
use crate::services::output_writer::OutputWriter;
use crate::settings::FilePolicy;
use crate::traits::MockOverwriteConsent;

fn writer(safe_mode: bool) -> (TempDir, OutputWriter) {
    let dir = tempfile::tempdir().unwrap();
    let policy = FilePolicy {
        blocked_directories: vec!["generated/secret".into()],
        ..FilePolicy::default()
    };
    let writer = OutputWriter::new(dir.path(), policy, safe_mode);
    (dir, writer)
}

#[tokio::test]
async fn test_write_inside_allowed_directory() {
    let (dir, writer) = writer(true);

    let written = writer
        .write(Path::new("src/main/java/com/example/RubyBlock.java"), "public class RubyBlock {}")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(written, dir.path().join("src/main/java/com/example/RubyBlock.java"));
    assert_eq!(fs::read_to_string(&written).await.unwrap(), "public class RubyBlock {}");
}

#[tokio::test]
async fn test_rejects_outside_allowed_directories() {
    let (_dir, writer) = writer(true);

    let result = writer.write(Path::new("elsewhere/A.java"), "class A {}").await;
    assert!(matches!(result, Err(AssistantError::PathRejected { .. })));

    let escaped = writer.write(Path::new("generated/../../A.java"), "class A {}").await;
    assert!(matches!(escaped, Err(AssistantError::PathRejected { .. })));
}

#[tokio::test]
async fn test_rejects_blocked_directory_and_extension() {
    let (_dir, writer) = writer(true);

    let blocked = writer.write(Path::new("generated/secret/A.java"), "class A {}").await;
    assert!(matches!(blocked, Err(AssistantError::PathRejected { ref reason, .. }) if reason.contains("blocked")));

    let extension = writer.write(Path::new("generated/A.txt"), "text").await;
    assert!(matches!(extension, Err(AssistantError::PathRejected { ref reason, .. }) if reason.contains(".txt")));
}

#[tokio::test]
async fn test_rejects_oversized_content() {
    let dir = tempfile::tempdir().unwrap();
    let policy = FilePolicy {
        max_file_size_mb: 0,
        ..FilePolicy::default()
    };
    let writer = OutputWriter::new(dir.path(), policy, true);

    let result = writer.write(Path::new("generated/A.java"), "class A {}").await;
    assert!(matches!(result, Err(AssistantError::PathRejected { .. })));
    assert!(!dir.path().join("generated/A.java").exists());
}

#[tokio::test]
async fn test_overwrite_creates_backup() {
    let (dir, writer) = writer(true);
    let target = Path::new("generated/A.java");

    writer.write(target, "class A { /* v1 */ }").await.unwrap();
    writer.write(target, "class A { /* v2 */ }").await.unwrap();

    let backup = dir.path().join("generated/A.java.bak");
    assert_eq!(fs::read_to_string(&backup).await.unwrap(), "class A { /* v1 */ }");
    assert_eq!(
        fs::read_to_string(dir.path().join(target)).await.unwrap(),
        "class A { /* v2 */ }"
    );
}

#[tokio::test]
async fn test_unsafe_mode_skips_path_checks() {
    let (dir, writer) = writer(false);

    let written = writer.write(Path::new("notes/readme.md"), "# notes").await.unwrap().unwrap();
    assert_eq!(written, dir.path().join("notes/readme.md"));
}

fn consenting(dir: &TempDir, answer: bool, calls: usize, confirm_writes: bool) -> OutputWriter {
    let mut consent = MockOverwriteConsent::new();
    consent.expect_confirm().times(calls).returning(move |_, _| answer);
    OutputWriter::new(dir.path(), FilePolicy::default(), true).with_consent(Box::new(consent), confirm_writes)
}

#[tokio::test]
async fn test_declined_overwrite_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("generated/A.java");
    fs::create_dir_all(target.parent().unwrap()).await.unwrap();
    fs::write(&target, "class A { /* mine */ }").await.unwrap();

    let mut consent = MockOverwriteConsent::new();
    consent
        .expect_confirm()
        .withf(|path, exists| path.ends_with("generated/A.java") && *exists)
        .times(1)
        .returning(|_, _| false);
    let writer = OutputWriter::new(dir.path(), FilePolicy::default(), true).with_consent(Box::new(consent), true);

    let written = writer.write(Path::new("generated/A.java"), "class A {}").await.unwrap();

    assert!(written.is_none());
    assert_eq!(fs::read_to_string(&target).await.unwrap(), "class A { /* mine */ }");
    assert!(!dir.path().join("generated/A.java.bak").exists());
}

#[tokio::test]
async fn test_declined_create_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let writer = consenting(&dir, false, 1, true);

    let written = writer.write(Path::new("generated/B.java"), "class B {}").await.unwrap();

    assert!(written.is_none());
    assert!(!dir.path().join("generated/B.java").exists());
}

#[tokio::test]
async fn test_allowed_overwrite_writes_and_backs_up() {
    let dir = tempfile::tempdir().unwrap();
    let writer = consenting(&dir, true, 2, true);
    let target = Path::new("generated/A.java");

    writer.write(target, "class A { /* v1 */ }").await.unwrap();
    let written = writer.write(target, "class A { /* v2 */ }").await.unwrap();

    assert_eq!(written, Some(dir.path().join("generated/A.java")));
    assert_eq!(fs::read_to_string(dir.path().join(target)).await.unwrap(), "class A { /* v2 */ }");
    assert_eq!(
        fs::read_to_string(dir.path().join("generated/A.java.bak")).await.unwrap(),
        "class A { /* v1 */ }"
    );
}

#[tokio::test]
async fn test_consent_not_asked_when_confirmation_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let writer = consenting(&dir, false, 0, false);

    let written = writer.write(Path::new("generated/C.java"), "class C {}").await.unwrap();

    assert!(written.is_some());
}

#[tokio::test]
async fn test_consent_not_asked_outside_safe_mode() {
    let dir = tempfile::tempdir().unwrap();
    let mut consent = MockOverwriteConsent::new();
    consent.expect_confirm().never();
    let writer = OutputWriter::new(dir.path(), FilePolicy::default(), false).with_consent(Box::new(consent), true);

    let written = writer.write(Path::new("notes/D.md"), "# d").await.unwrap();

    assert!(written.is_some());
}
