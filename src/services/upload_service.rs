use std::path::PathBuf;

use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

use crate::validation::FieldErrors;

/// Sub-directory and URL segment for registry photos.
pub const PROFESSIONALS_DIR: &str = "professionals";
/// URL prefix the upload directory is served under.
pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Registry photo is required")]
    Missing,
    #[error("Only JPG and PNG images are allowed (got {0})")]
    UnsupportedType(String),
    #[error("File too large (maximum {limit_mib}MB)")]
    TooLarge { limit_mib: usize },
    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn into_field_errors(self, field: &str) -> FieldErrors {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), self.to_string());
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
        }
    }

    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let parsed: mime::Mime = content_type.trim().parse().ok()?;
        if parsed.type_() != mime::IMAGE {
            return None;
        }
        match parsed.subtype().as_str() {
            "jpeg" | "jpg" | "pjpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            _ => None,
        }
    }
}

/// An uploaded file as read from a multipart field.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Stores uploaded images on the local filesystem.
#[derive(Debug, Clone)]
pub struct UploadService {
    root: PathBuf,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Type and size checks, without touching the disk.
    pub fn check(&self, upload: Option<&ImageUpload>) -> Result<ImageKind, UploadError> {
        let upload = upload.ok_or(UploadError::Missing)?;
        if upload.bytes.is_empty() {
            return Err(UploadError::Missing);
        }

        let content_type = upload.content_type.as_deref().unwrap_or_default();
        let kind = ImageKind::from_content_type(content_type)
            .ok_or_else(|| UploadError::UnsupportedType(content_type.to_string()))?;

        if upload.bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                limit_mib: self.max_bytes / (1024 * 1024),
            });
        }

        Ok(kind)
    }

    /// Save a registry photo under a random name and return its web path.
    pub async fn save_registry_photo(&self, upload: &ImageUpload) -> Result<String, UploadError> {
        let kind = self.check(Some(upload))?;
        let file_name = format!("{}.{}", Uuid::new_v4().simple(), kind.extension());

        let dir = self.root.join(PROFESSIONALS_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), &upload.bytes).await?;

        tracing::debug!(file_name = %file_name, bytes = upload.bytes.len(), "registry photo stored");
        Ok(format!("{UPLOADS_ROUTE}/{PROFESSIONALS_DIR}/{file_name}"))
    }

    /// Best-effort removal of a file previously returned by `save_registry_photo`.
    pub async fn remove(&self, web_path: &str) {
        let Some(relative) = web_path.strip_prefix(UPLOADS_ROUTE) else {
            return;
        };
        let relative = relative.trim_start_matches('/');
        if relative.split('/').any(|segment| segment == "..") {
            return;
        }
        if let Err(err) = tokio::fs::remove_file(self.root.join(relative)).await {
            tracing::warn!(path = %web_path, error = %err, "failed to remove upload");
        }
    }
}
