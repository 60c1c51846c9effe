//! Database-backed tests for password reset token redemption.
//!
//! The reset token only ever leaves the system inside an email, so
//! single-use and expiry semantics cannot be observed over HTTP. These
//! tests drive the repositories directly against the database.
//!
//! Requires `DATABASE_URL` pointing at a migrated database.
//!
//! Run with: cargo test -p atelier-integration-tests -- --ignored

use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use atelier_core::{Email, UserId, UserRole};
use atelier_server::db::{PasswordResetRepository, UserRepository, create_pool};
use atelier_server::services::auth::hash_password;

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to database")
}

/// Create a throwaway account to attach reset tokens to.
async fn seeded_user(pool: &PgPool) -> UserId {
    let email = Email::parse(&format!("reset-test-{}@example.test", Uuid::new_v4()))
        .expect("valid email");
    let hash = hash_password("original-password-1234").expect("Failed to hash password");

    UserRepository::new(pool)
        .create(&email, &hash, UserRole::Artist)
        .await
        .expect("Failed to create user")
        .id
}

// ============================================================================
// Token Redemption Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires database"]
async fn test_reset_token_is_single_use() {
    let pool = pool().await;
    let user_id = seeded_user(&pool).await;
    let repo = PasswordResetRepository::new(&pool);

    let token = format!("single-use-{}", Uuid::new_v4());
    repo.create(user_id, &token)
        .await
        .expect("Failed to store token");

    let first_hash = hash_password("first-new-password").expect("Failed to hash password");
    let consumed = repo
        .consume(&token, &first_hash)
        .await
        .expect("Failed to consume token");
    assert_eq!(consumed, Some(user_id));

    // A second redemption of the same token changes nothing.
    let second_hash = hash_password("second-new-password").expect("Failed to hash password");
    let consumed = repo
        .consume(&token, &second_hash)
        .await
        .expect("Failed to consume token");
    assert_eq!(consumed, None);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_expired_reset_token_is_refused() {
    let pool = pool().await;
    let user_id = seeded_user(&pool).await;
    let repo = PasswordResetRepository::new(&pool);

    let token = format!("expired-{}", Uuid::new_v4());
    repo.create(user_id, &token)
        .await
        .expect("Failed to store token");

    // Age the token past its lifetime.
    sqlx::query(
        "UPDATE password_reset_token SET expires_at = now() - interval '1 minute' \
         WHERE user_id = $1",
    )
    .bind(user_id.as_i32())
    .execute(&pool)
    .await
    .expect("Failed to age token");

    let new_hash = hash_password("too-late-password").expect("Failed to hash password");
    let consumed = repo
        .consume(&token, &new_hash)
        .await
        .expect("Failed to consume token");
    assert_eq!(consumed, None);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_new_reset_token_invalidates_previous_one() {
    let pool = pool().await;
    let user_id = seeded_user(&pool).await;
    let repo = PasswordResetRepository::new(&pool);

    let first = format!("first-{}", Uuid::new_v4());
    repo.create(user_id, &first)
        .await
        .expect("Failed to store first token");

    let second = format!("second-{}", Uuid::new_v4());
    repo.create(user_id, &second)
        .await
        .expect("Failed to store second token");

    let new_hash = hash_password("replacement-password").expect("Failed to hash password");
    let consumed = repo
        .consume(&first, &new_hash)
        .await
        .expect("Failed to consume stale token");
    assert_eq!(consumed, None, "only the latest token stays valid");

    let consumed = repo
        .consume(&second, &new_hash)
        .await
        .expect("Failed to consume current token");
    assert_eq!(consumed, Some(user_id));
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_unknown_reset_token_is_refused() {
    let pool = pool().await;
    let repo = PasswordResetRepository::new(&pool);

    let new_hash = hash_password("guessed-password").expect("Failed to hash password");
    let consumed = repo
        .consume(&format!("unknown-{}", Uuid::new_v4()), &new_hash)
        .await
        .expect("Failed to consume token");
    assert_eq!(consumed, None);
}
