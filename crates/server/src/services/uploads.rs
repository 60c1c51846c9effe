//! Local-disk upload storage.
//!
//! Uploaded bytes land in the configured directory under a generated UUID
//! file name and are served back at `/uploads/{file_name}`. The original
//! name is kept only as database metadata, never used on disk.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::error::AppError;

/// MIME types accepted for upload.
const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "video/mp4",
    "video/webm",
    "application/pdf",
];

/// Longest extension carried over from the original file name.
const MAX_EXTENSION_LEN: usize = 8;

/// Errors that can occur while storing uploads.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file exceeds the configured size cap.
    #[error("file too large: {size} bytes (max {max})")]
    TooLarge { size: u64, max: u64 },

    /// The content type is not accepted.
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),

    /// The multipart request carried no file field.
    #[error("no file in request")]
    MissingFile,

    /// Disk I/O failed.
    #[error("upload I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::TooLarge { .. }
            | UploadError::UnsupportedType(_)
            | UploadError::MissingFile => Self::BadRequest(err.to_string()),
            UploadError::Io(e) => Self::Internal(format!("upload storage failed: {e}")),
        }
    }
}

/// A file written to the upload directory.
#[derive(Debug)]
pub struct StoredFile {
    /// Generated on-disk name, unique per upload.
    pub file_name: String,
    /// Size in bytes.
    pub size_bytes: i64,
}

/// Stores and removes files in the upload directory.
#[derive(Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: u64,
}

impl UploadStore {
    /// Create a store from the upload configuration.
    #[must_use]
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            max_bytes: config.max_bytes,
        }
    }

    /// The directory files are written to (also served at `/uploads`).
    #[must_use]
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Validate and write an uploaded file to disk.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::TooLarge` or `UploadError::UnsupportedType` on
    /// validation failure, `UploadError::Io` if the write fails.
    pub async fn save(
        &self,
        original_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<StoredFile, UploadError> {
        if !ALLOWED_MIME_TYPES.contains(&content_type) {
            return Err(UploadError::UnsupportedType(content_type.to_string()));
        }

        let size = data.len() as u64;
        if size > self.max_bytes {
            return Err(UploadError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }

        let file_name = generate_file_name(original_name);
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&file_name), data).await?;

        tracing::info!(file_name = %file_name, size_bytes = size, "upload stored");

        Ok(StoredFile {
            file_name,
            size_bytes: i64::try_from(size).unwrap_or(i64::MAX),
        })
    }

    /// Remove a stored file. A file already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` if removal fails for any other reason.
    pub async fn remove(&self, file_name: &str) -> Result<(), UploadError> {
        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Generate a unique on-disk name, keeping a sanitized extension.
fn generate_file_name(original_name: &str) -> String {
    let stem = Uuid::new_v4().simple().to_string();
    match sanitized_extension(original_name) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

/// Extract a lowercase alphanumeric extension, if the original has one.
fn sanitized_extension(original_name: &str) -> Option<String> {
    let ext = original_name.rsplit_once('.')?.1;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
