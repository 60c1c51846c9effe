//! Media file model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use atelier_core::{ArtistId, MediaFileId, MediaKind};

/// An uploaded asset tracked in the database with a file on local disk.
///
/// `artist_id` is set for uploads through the artist portal; admin library
/// uploads are unowned.
#[derive(Debug, Clone, Serialize)]
pub struct MediaFile {
    pub id: MediaFileId,
    pub artist_id: Option<ArtistId>,
    /// Stored (UUID-based) filename under the upload directory.
    pub file_name: String,
    /// Filename as submitted by the client.
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

impl MediaFile {
    /// Coarse classification used by library filters.
    #[must_use]
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.mime_type)
    }

    /// Public URL path for the stored file.
    #[must_use]
    pub fn url_path(&self) -> String {
        format!("/uploads/{}", self.file_name)
    }
}
