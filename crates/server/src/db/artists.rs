//! Artist profile repository.
//!
//! Holds the approval-workflow queries: pending profiles are rows with
//! `approved = false`; rejection deletes the backing user (the artist row
//! goes with it via `ON DELETE CASCADE`).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use atelier_core::{ArtistId, UserId};

use super::{PageParams, RepositoryError};
use crate::models::artist::Artist;

/// Internal row type for `artist` queries.
#[derive(Debug, sqlx::FromRow)]
struct ArtistRow {
    id: i32,
    user_id: i32,
    name: String,
    bio: String,
    statement: String,
    website: Option<String>,
    approved: bool,
    approved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ArtistRow> for Artist {
    fn from(row: ArtistRow) -> Self {
        Self {
            id: ArtistId::new(row.id),
            user_id: UserId::new(row.user_id),
            name: row.name,
            bio: row.bio,
            statement: row.statement,
            website: row.website,
            approved: row.approved,
            approved_at: row.approved_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Contact details pre-fetched before a rejection deletes the rows.
#[derive(Debug, sqlx::FromRow)]
pub struct ArtistContact {
    pub user_id: i32,
    pub name: String,
    pub email: String,
}

const ARTIST_COLUMNS: &str =
    "id, user_id, name, bio, statement, website, approved, approved_at, created_at, updated_at";

/// Repository for artist database operations.
pub struct ArtistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ArtistRepository<'a> {
    /// Create a new artist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending artist profile for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has a profile.
    pub async fn create(
        &self,
        user_id: UserId,
        name: &str,
        bio: &str,
        statement: &str,
        website: Option<&str>,
    ) -> Result<Artist, RepositoryError> {
        let row = sqlx::query_as::<_, ArtistRow>(&format!(
            "INSERT INTO artist (user_id, name, bio, statement, website) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {ARTIST_COLUMNS}"
        ))
        .bind(user_id.as_i32())
        .bind(name)
        .bind(bio)
        .bind(statement)
        .bind(website)
        .fetch_one(self.pool)
        .await
        .map_err(|e| super::map_unique_violation(e, "artist profile already exists"))?;

        Ok(row.into())
    }

    /// Get an artist by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ArtistId) -> Result<Option<Artist>, RepositoryError> {
        let row = sqlx::query_as::<_, ArtistRow>(&format!(
            "SELECT {ARTIST_COLUMNS} FROM artist WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get the artist profile owned by a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user_id(&self, user_id: UserId) -> Result<Option<Artist>, RepositoryError> {
        let row = sqlx::query_as::<_, ArtistRow>(&format!(
            "SELECT {ARTIST_COLUMNS} FROM artist WHERE user_id = $1"
        ))
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List artists, optionally filtered by approval state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        approved: Option<bool>,
        page: PageParams,
    ) -> Result<Vec<Artist>, RepositoryError> {
        let rows = sqlx::query_as::<_, ArtistRow>(&format!(
            "SELECT {ARTIST_COLUMNS} FROM artist \
             WHERE ($1::boolean IS NULL OR approved = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(approved)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Approve a pending artist: set the flag and stamp `approved_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the artist doesn't exist.
    pub async fn approve(&self, id: ArtistId) -> Result<Artist, RepositoryError> {
        let row = sqlx::query_as::<_, ArtistRow>(&format!(
            "UPDATE artist SET approved = TRUE, approved_at = now(), updated_at = now() \
             WHERE id = $1 RETURNING {ARTIST_COLUMNS}"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Update an artist's profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the artist doesn't exist.
    pub async fn update_profile(
        &self,
        id: ArtistId,
        name: &str,
        bio: &str,
        statement: &str,
        website: Option<&str>,
    ) -> Result<Artist, RepositoryError> {
        let row = sqlx::query_as::<_, ArtistRow>(&format!(
            "UPDATE artist SET name = $1, bio = $2, statement = $3, website = $4, \
             updated_at = now() WHERE id = $5 RETURNING {ARTIST_COLUMNS}"
        ))
        .bind(name)
        .bind(bio)
        .bind(statement)
        .bind(website)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Fetch contact info for the rejection email before deletion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn contact_info(
        &self,
        id: ArtistId,
    ) -> Result<Option<ArtistContact>, RepositoryError> {
        let row = sqlx::query_as::<_, ArtistContact>(
            "SELECT a.user_id, a.name, u.email \
             FROM artist a JOIN app_user u ON u.id = a.user_id \
             WHERE a.id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Reject an artist: delete the user row (the profile cascades).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the artist doesn't exist.
    /// Returns `RepositoryError::Conflict` if any of the artist's pieces
    /// appear in an order; accounts with sales on record cannot be removed.
    pub async fn delete_with_user(&self, id: ArtistId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM app_user WHERE id = (SELECT user_id FROM artist WHERE id = $1)",
        )
        .bind(id.as_i32())
        .execute(self.pool)
        .await
        .map_err(|e| {
            super::map_foreign_key_violation(e, "artist has sold artworks and cannot be removed")
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
