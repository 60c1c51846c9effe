//! Notification preference repository.

use sqlx::PgPool;

use atelier_core::ArtistId;

use super::RepositoryError;
use crate::models::artist::NotificationPreferences;

#[derive(Debug, sqlx::FromRow)]
struct PreferencesRow {
    order_emails: bool,
    approval_emails: bool,
    marketing_emails: bool,
}

impl From<PreferencesRow> for NotificationPreferences {
    fn from(row: PreferencesRow) -> Self {
        Self {
            order_emails: row.order_emails,
            approval_emails: row.approval_emails,
            marketing_emails: row.marketing_emails,
        }
    }
}

/// Repository for per-artist email switches.
pub struct NotificationPreferencesRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NotificationPreferencesRepository<'a> {
    /// Create a new preferences repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an artist's preferences, falling back to the defaults when no
    /// row has been written yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_default(
        &self,
        artist_id: ArtistId,
    ) -> Result<NotificationPreferences, RepositoryError> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            "SELECT order_emails, approval_emails, marketing_emails \
             FROM notification_preferences WHERE artist_id = $1",
        )
        .bind(artist_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into).unwrap_or_default())
    }

    /// Insert or replace an artist's preferences.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert(
        &self,
        artist_id: ArtistId,
        prefs: &NotificationPreferences,
    ) -> Result<NotificationPreferences, RepositoryError> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            "INSERT INTO notification_preferences \
             (artist_id, order_emails, approval_emails, marketing_emails) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (artist_id) DO UPDATE SET \
             order_emails = EXCLUDED.order_emails, \
             approval_emails = EXCLUDED.approval_emails, \
             marketing_emails = EXCLUDED.marketing_emails \
             RETURNING order_emails, approval_emails, marketing_emails",
        )
        .bind(artist_id.as_i32())
        .bind(prefs.order_emails)
        .bind(prefs.approval_emails)
        .bind(prefs.marketing_emails)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}
