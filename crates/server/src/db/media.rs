//! Media file repository.
//!
//! Rows describe files on local disk; the bytes themselves live under the
//! configured upload directory and are served at `/uploads/{file_name}`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use atelier_core::{ArtistId, MediaFileId, MediaKind};

use super::{PageParams, RepositoryError, map_unique_violation};
use crate::models::media::MediaFile;

#[derive(Debug, sqlx::FromRow)]
struct MediaFileRow {
    id: i32,
    artist_id: Option<i32>,
    file_name: String,
    original_name: String,
    mime_type: String,
    size_bytes: i64,
    created_at: DateTime<Utc>,
}

impl From<MediaFileRow> for MediaFile {
    fn from(row: MediaFileRow) -> Self {
        Self {
            id: MediaFileId::new(row.id),
            artist_id: row.artist_id.map(ArtistId::new),
            file_name: row.file_name,
            original_name: row.original_name,
            mime_type: row.mime_type,
            size_bytes: row.size_bytes,
            created_at: row.created_at,
        }
    }
}

const MEDIA_COLUMNS: &str =
    "id, artist_id, file_name, original_name, mime_type, size_bytes, created_at";

/// Repository for media file database operations.
pub struct MediaRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MediaRepository<'a> {
    /// Create a new media repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record an uploaded file.
    ///
    /// `artist_id` is `None` for admin uploads.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the generated file name collides.
    pub async fn create(
        &self,
        artist_id: Option<ArtistId>,
        file_name: &str,
        original_name: &str,
        mime_type: &str,
        size_bytes: i64,
    ) -> Result<MediaFile, RepositoryError> {
        let row = sqlx::query_as::<_, MediaFileRow>(&format!(
            "INSERT INTO media_file (artist_id, file_name, original_name, mime_type, size_bytes) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {MEDIA_COLUMNS}"
        ))
        .bind(artist_id.map(|id| id.as_i32()))
        .bind(file_name)
        .bind(original_name)
        .bind(mime_type)
        .bind(size_bytes)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "file name already exists"))?;

        Ok(row.into())
    }

    /// List media files, newest first.
    ///
    /// Filters: owning artist, a search term against the original name, and
    /// a kind. "Document" matches everything that is not an image or video.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        artist_id: Option<ArtistId>,
        search: Option<&str>,
        kind: Option<MediaKind>,
        page: PageParams,
    ) -> Result<Vec<MediaFile>, RepositoryError> {
        let kind_clause = match kind {
            None => "TRUE",
            Some(MediaKind::Image) => "mime_type LIKE 'image/%'",
            Some(MediaKind::Video) => "mime_type LIKE 'video/%'",
            Some(MediaKind::Document) => {
                "mime_type NOT LIKE 'image/%' AND mime_type NOT LIKE 'video/%'"
            }
        };

        let rows = sqlx::query_as::<_, MediaFileRow>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media_file \
             WHERE ($1::integer IS NULL OR artist_id = $1) \
               AND ($2::text IS NULL OR original_name ILIKE '%' || $2 || '%') \
               AND ({kind_clause}) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(artist_id.map(|id| id.as_i32()))
        .bind(search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete a record, returning the on-disk file name so the caller can
    /// remove the bytes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the record doesn't exist.
    pub async fn delete(&self, id: MediaFileId) -> Result<String, RepositoryError> {
        let file_name: Option<String> =
            sqlx::query_scalar("DELETE FROM media_file WHERE id = $1 RETURNING file_name")
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        file_name.ok_or(RepositoryError::NotFound)
    }

    /// Delete a record owned by a specific artist, enforcing ownership.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the record doesn't exist or
    /// belongs to someone else.
    pub async fn delete_owned(
        &self,
        id: MediaFileId,
        artist_id: ArtistId,
    ) -> Result<String, RepositoryError> {
        let file_name: Option<String> = sqlx::query_scalar(
            "DELETE FROM media_file WHERE id = $1 AND artist_id = $2 RETURNING file_name",
        )
        .bind(id.as_i32())
        .bind(artist_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        file_name.ok_or(RepositoryError::NotFound)
    }
}
