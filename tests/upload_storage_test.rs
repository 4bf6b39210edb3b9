use assert_matches::assert_matches;
use body_health::services::{ImageUpload, UploadError, UploadService};
use bytes::Bytes;
use tempfile::TempDir;

fn photo(content_type: &str, len: usize) -> ImageUpload {
    ImageUpload {
        file_name: Some("registry".to_string()),
        content_type: Some(content_type.to_string()),
        bytes: Bytes::from(vec![7u8; len]),
    }
}

#[tokio::test]
async fn test_registry_photo_is_stored_and_removed() {
    let dir = TempDir::new().unwrap();
    let uploads = UploadService::new(dir.path(), 1024);

    let web_path = uploads
        .save_registry_photo(&photo("image/png", 100))
        .await
        .unwrap();
    assert!(web_path.starts_with("/uploads/professionals/"));
    assert!(web_path.ends_with(".png"));

    let file_name = web_path.rsplit('/').next().unwrap();
    let stored = dir.path().join("professionals").join(file_name);
    assert_eq!(std::fs::read(&stored).unwrap().len(), 100);

    uploads.remove(&web_path).await;
    assert!(!stored.exists());
}

#[tokio::test]
async fn test_extension_follows_content_type() {
    let dir = TempDir::new().unwrap();
    let uploads = UploadService::new(dir.path(), 1024);

    let web_path = uploads
        .save_registry_photo(&photo("image/jpeg", 10))
        .await
        .unwrap();
    assert!(web_path.ends_with(".jpg"));
}

#[tokio::test]
async fn test_rejected_photos_are_not_written() {
    let dir = TempDir::new().unwrap();
    let uploads = UploadService::new(dir.path(), 1024);

    assert_matches!(
        uploads.save_registry_photo(&photo("image/png", 2048)).await,
        Err(UploadError::TooLarge { .. })
    );
    assert_matches!(
        uploads.save_registry_photo(&photo("application/pdf", 10)).await,
        Err(UploadError::UnsupportedType(_))
    );
    assert!(!dir.path().join("professionals").exists());
}

#[tokio::test]
async fn test_remove_ignores_paths_outside_uploads() {
    let dir = TempDir::new().unwrap();
    let outside = dir.path().join("keep.txt");
    std::fs::write(&outside, b"keep").unwrap();

    let uploads = UploadService::new(dir.path().join("uploads"), 1024);
    uploads.remove("/uploads/../keep.txt").await;
    uploads.remove("/etc/passwd").await;

    assert!(outside.exists());
}
