//! Database operations for the Atelier `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `app_user` - Authentication accounts (admin and artist logins)
//! - `artist` - Artist profiles with the approval flag
//! - `artwork` - Catalog pieces owned by artists
//! - `"order"` / `order_item` - Guest-checkout orders
//! - `media_file` - Uploaded assets on local disk
//! - `notification_preferences` - Per-artist email switches
//! - `password_reset_token` - Single-use, time-boxed reset tokens
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p atelier-cli -- migrate
//! ```

pub mod artists;
pub mod artworks;
pub mod media;
pub mod notifications;
pub mod orders;
pub mod password_reset;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use artists::ArtistRepository;
pub use artworks::ArtworkRepository;
pub use media::MediaRepository;
pub use notifications::NotificationPreferencesRepository;
pub use orders::OrderRepository;
pub use password_reset::PasswordResetRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Page parameters for listing queries.
///
/// Pages are 1-based; `per_page` is capped so a client cannot request the
/// whole table in one response.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    page: u32,
    per_page: u32,
}

impl PageParams {
    /// Maximum rows per page.
    pub const MAX_PER_PAGE: u32 = 100;

    /// Default rows per page.
    pub const DEFAULT_PER_PAGE: u32 = 20;

    /// Create page parameters, clamping out-of-range values.
    #[must_use]
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(Self::DEFAULT_PER_PAGE)
                .clamp(1, Self::MAX_PER_PAGE),
        }
    }

    /// SQL LIMIT value.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.per_page as i64
    }

    /// SQL OFFSET value.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page after clamping.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Map a unique-constraint violation onto [`RepositoryError::Conflict`].
pub(crate) fn map_unique_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}

/// Map a foreign-key violation onto [`RepositoryError::Conflict`].
///
/// Used by deletes that `order_item` references block: a sold piece stays
/// on record for its orders.
pub(crate) fn map_foreign_key_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_defaults() {
        let page = PageParams::default();
        assert_eq!(page.limit(), 20);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_params_offset() {
        let page = PageParams::new(Some(3), Some(25));
        assert_eq!(page.limit(), 25);
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn test_page_params_clamps() {
        let page = PageParams::new(Some(0), Some(10_000));
        assert_eq!(page.page(), 1);
        assert_eq!(page.per_page(), PageParams::MAX_PER_PAGE);
    }
}
