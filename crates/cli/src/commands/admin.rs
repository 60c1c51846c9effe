//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! atelier-cli admin create -e admin@example.com -p 'a-strong-password'
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use atelier_core::{Email, UserRole};
use atelier_server::db::UserRepository;
use atelier_server::services::auth::{hash_password, validate_password};

use super::CliError;

/// Create a new admin account.
///
/// # Errors
///
/// Returns `CliError` if the email or password is invalid, the email is
/// already registered, or the insert fails.
pub async fn create_account(email: &str, password: &str) -> Result<i32, CliError> {
    let email = Email::parse(email)?;
    validate_password(password)?;
    let password_hash = hash_password(password)?;

    let pool = super::connect().await?;

    tracing::info!("Creating admin account: {}", email);
    let user = UserRepository::new(&pool)
        .create(&email, &password_hash, UserRole::Admin)
        .await?;

    tracing::info!(
        "Admin account created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id.as_i32())
}
