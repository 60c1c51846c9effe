//! Password reset token repository.
//!
//! Only a SHA-256 hash of the token is stored; the plaintext goes out once
//! in the reset email. Consumption is transactional and locks the row, so a
//! token cannot be redeemed twice even under concurrent requests.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use atelier_core::UserId;

use super::RepositoryError;

/// How long a reset token stays valid.
pub const TOKEN_TTL: Duration = Duration::hours(1);

fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Repository for password reset tokens.
pub struct PasswordResetRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PasswordResetRepository<'a> {
    /// Create a new reset token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a fresh token for a user, invalidating any earlier ones.
    ///
    /// Returns the expiry timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the writes fail.
    pub async fn create(
        &self,
        user_id: UserId,
        token: &str,
    ) -> Result<DateTime<Utc>, RepositoryError> {
        let expires_at = Utc::now() + TOKEN_TTL;
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM password_reset_token WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO password_reset_token (user_id, token_hash, expires_at) \
             VALUES ($1, $2, $3)",
        )
        .bind(user_id.as_i32())
        .bind(hash_token(token))
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(expires_at)
    }

    /// Redeem a token and set the new password hash in one transaction.
    ///
    /// Returns the user whose password changed, or `None` when the token is
    /// unknown, expired, or already used. The three cases are deliberately
    /// indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn consume(
        &self,
        token: &str,
        new_password_hash: &str,
    ) -> Result<Option<UserId>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(i32, i32, DateTime<Utc>, bool)> = sqlx::query_as(
            "SELECT id, user_id, expires_at, used FROM password_reset_token \
             WHERE token_hash = $1 FOR UPDATE",
        )
        .bind(hash_token(token))
        .fetch_optional(&mut *tx)
        .await?;

        let Some((token_id, user_id, expires_at, used)) = row else {
            return Ok(None);
        };

        if used || expires_at < Utc::now() {
            return Ok(None);
        }

        sqlx::query("UPDATE password_reset_token SET used = TRUE WHERE id = $1")
            .bind(token_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE app_user SET password_hash = $1, updated_at = now() WHERE id = $2")
            .bind(new_password_hash)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(UserId::new(user_id)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_stable_hex() {
        let a = hash_token("abc123");
        let b = hash_token("abc123");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_token_differs_per_input() {
        assert_ne!(hash_token("token-a"), hash_token("token-b"));
    }
}
