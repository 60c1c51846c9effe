//! Artwork repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use atelier_core::{ArtistId, ArtworkAvailability, ArtworkId};

use super::{PageParams, RepositoryError};
use crate::models::artwork::Artwork;

/// Internal row type for `artwork` queries.
#[derive(Debug, sqlx::FromRow)]
struct ArtworkRow {
    id: i32,
    artist_id: i32,
    title: String,
    description: String,
    medium: String,
    dimensions: String,
    price: Decimal,
    availability: ArtworkAvailability,
    image_path: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ArtworkRow> for Artwork {
    fn from(row: ArtworkRow) -> Self {
        Self {
            id: ArtworkId::new(row.id),
            artist_id: ArtistId::new(row.artist_id),
            title: row.title,
            description: row.description,
            medium: row.medium,
            dimensions: row.dimensions,
            price: row.price,
            availability: row.availability,
            image_path: row.image_path,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Fields for creating or replacing an artwork.
#[derive(Debug, Clone)]
pub struct ArtworkFields {
    pub title: String,
    pub description: String,
    pub medium: String,
    pub dimensions: String,
    pub price: Decimal,
    pub image_path: Option<String>,
}

const ARTWORK_COLUMNS: &str = "id, artist_id, title, description, medium, dimensions, price, \
                               availability, image_path, created_at, updated_at";

/// Repository for artwork database operations.
pub struct ArtworkRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ArtworkRepository<'a> {
    /// Create a new artwork repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an artwork for an artist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        artist_id: ArtistId,
        fields: &ArtworkFields,
    ) -> Result<Artwork, RepositoryError> {
        let row = sqlx::query_as::<_, ArtworkRow>(&format!(
            "INSERT INTO artwork (artist_id, title, description, medium, dimensions, price, image_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {ARTWORK_COLUMNS}"
        ))
        .bind(artist_id.as_i32())
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.medium)
        .bind(&fields.dimensions)
        .bind(fields.price)
        .bind(fields.image_path.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get an artwork by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ArtworkId) -> Result<Option<Artwork>, RepositoryError> {
        let row = sqlx::query_as::<_, ArtworkRow>(&format!(
            "SELECT {ARTWORK_COLUMNS} FROM artwork WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List available artworks for the storefront, optionally matching a
    /// search term against title and medium.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_available(
        &self,
        search: Option<&str>,
        page: PageParams,
    ) -> Result<Vec<Artwork>, RepositoryError> {
        let rows = sqlx::query_as::<_, ArtworkRow>(&format!(
            "SELECT {ARTWORK_COLUMNS} FROM artwork \
             WHERE availability = 'available'::artwork_availability \
               AND ($1::text IS NULL OR title ILIKE '%' || $1 || '%' OR medium ILIKE '%' || $1 || '%') \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List an artist's artworks.
    ///
    /// `only_available` restricts to purchasable pieces (the public view);
    /// the portal passes `false` to see everything it owns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_artist(
        &self,
        artist_id: ArtistId,
        only_available: bool,
        page: PageParams,
    ) -> Result<Vec<Artwork>, RepositoryError> {
        let rows = sqlx::query_as::<_, ArtworkRow>(&format!(
            "SELECT {ARTWORK_COLUMNS} FROM artwork \
             WHERE artist_id = $1 \
               AND (NOT $2 OR availability = 'available'::artwork_availability) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(artist_id.as_i32())
        .bind(only_available)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update an artwork's fields, enforcing ownership.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the artwork doesn't exist or
    /// doesn't belong to the artist.
    pub async fn update(
        &self,
        id: ArtworkId,
        artist_id: ArtistId,
        fields: &ArtworkFields,
    ) -> Result<Artwork, RepositoryError> {
        let row = sqlx::query_as::<_, ArtworkRow>(&format!(
            "UPDATE artwork SET title = $1, description = $2, medium = $3, dimensions = $4, \
             price = $5, image_path = $6, updated_at = now() \
             WHERE id = $7 AND artist_id = $8 RETURNING {ARTWORK_COLUMNS}"
        ))
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.medium)
        .bind(&fields.dimensions)
        .bind(fields.price)
        .bind(fields.image_path.as_deref())
        .bind(id.as_i32())
        .bind(artist_id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Set the availability state (admin holds, un-reserving, etc.).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the artwork doesn't exist.
    pub async fn set_availability(
        &self,
        id: ArtworkId,
        availability: ArtworkAvailability,
    ) -> Result<Artwork, RepositoryError> {
        let row = sqlx::query_as::<_, ArtworkRow>(&format!(
            "UPDATE artwork SET availability = $1, updated_at = now() \
             WHERE id = $2 RETURNING {ARTWORK_COLUMNS}"
        ))
        .bind(availability)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete an artwork, enforcing ownership.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the artwork doesn't exist or
    /// doesn't belong to the artist.
    /// Returns `RepositoryError::Conflict` if the artwork appears in an
    /// order; sold pieces stay on record.
    pub async fn delete(&self, id: ArtworkId, artist_id: ArtistId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM artwork WHERE id = $1 AND artist_id = $2")
            .bind(id.as_i32())
            .bind(artist_id.as_i32())
            .execute(self.pool)
            .await
            .map_err(|e| {
                super::map_foreign_key_violation(e, "artwork appears in an order and cannot be deleted")
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
