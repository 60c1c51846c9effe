//! Authentication service.
//!
//! Handles artist registration, password and TOTP login, two-factor
//! enrollment, and the password-reset flow. Route handlers never touch
//! password hashes or TOTP secrets directly.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use rand::Rng;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use totp_rs::{Algorithm, Secret, TOTP};

use atelier_core::{Email, UserId, UserRole};

use crate::config::AdminBootstrapConfig;
use crate::db::RepositoryError;
use crate::db::artists::ArtistRepository;
use crate::db::password_reset::PasswordResetRepository;
use crate::db::users::UserRepository;
use crate::middleware::auth::JwtKeys;
use crate::models::artist::Artist;
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// TOTP issuer shown in authenticator apps.
const TOTP_ISSUER: &str = "Atelier";

/// A successful login: signed access token plus the account.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

/// Fresh TOTP enrollment material.
#[derive(Debug)]
pub struct TotpSetup {
    /// Base32-encoded secret the client must echo back on enable.
    pub secret: String,
    /// `otpauth://` URL for QR-code provisioning.
    pub otpauth_url: String,
}

/// Artist registration input.
#[derive(Debug)]
pub struct ArtistRegistration<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    pub bio: &'a str,
    pub statement: &'a str,
    pub website: Option<&'a str>,
}

/// Authentication service.
pub struct AuthService<'a> {
    pool: &'a PgPool,
    users: UserRepository<'a>,
    artists: ArtistRepository<'a>,
    jwt: &'a JwtKeys,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, jwt: &'a JwtKeys) -> Self {
        Self {
            pool,
            users: UserRepository::new(pool),
            artists: ArtistRepository::new(pool),
            jwt,
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new artist account with a pending profile.
    ///
    /// The account exists immediately but cannot log in until an admin
    /// approves the profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register_artist(
        &self,
        registration: ArtistRegistration<'_>,
    ) -> Result<(User, Artist), AuthError> {
        let email = Email::parse(registration.email)?;
        validate_password(registration.password)?;
        let password_hash = hash_password(registration.password)?;

        let user = self
            .users
            .create(&email, &password_hash, UserRole::Artist)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let artist = match self
            .artists
            .create(
                user.id,
                registration.name,
                registration.bio,
                registration.statement,
                registration.website,
            )
            .await
        {
            Ok(artist) => artist,
            Err(e) => {
                // Don't leave an account without a profile behind.
                if let Err(cleanup) = self.users.delete(user.id).await {
                    tracing::warn!(
                        user_id = %user.id,
                        error = %cleanup,
                        "failed to remove account after profile insert error"
                    );
                }
                return Err(e.into());
            }
        };

        tracing::info!(artist_id = %artist.id, "artist registered, awaiting review");

        Ok((user, artist))
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Login with email, password, and (when enrolled) a TOTP code.
    ///
    /// Artists must be approved and active; a pending or deactivated account
    /// is rejected even with the right password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::AccountPending` for unapproved artists.
    /// Returns `AuthError::AccountDeactivated` for deactivated accounts.
    /// Returns `AuthError::TotpRequired` / `AuthError::InvalidTotpCode` for
    /// two-factor failures.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        totp_code: Option<&str>,
    ) -> Result<LoginOutcome, AuthError> {
        let email = Email::parse(email)?;

        let credentials = self
            .users
            .get_credentials(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &credentials.password_hash)?;

        if !credentials.user.active {
            return Err(AuthError::AccountDeactivated);
        }

        if credentials.user.role == UserRole::Artist {
            let artist = self
                .artists
                .get_by_user_id(credentials.user.id)
                .await?
                .ok_or(AuthError::InvalidCredentials)?;
            if !artist.approved {
                return Err(AuthError::AccountPending);
            }
        }

        if let Some(secret) = &credentials.totp_secret {
            let code = totp_code.ok_or(AuthError::TotpRequired)?;
            verify_totp(secret, &credentials.user.email, code)?;
        }

        let token = self.jwt.sign(credentials.user.id, credentials.user.role)?;

        tracing::info!(user_id = %credentials.user.id, role = %credentials.user.role, "login");

        Ok(LoginOutcome {
            token,
            user: credentials.user,
        })
    }

    // =========================================================================
    // Two-Factor Auth
    // =========================================================================

    /// Generate fresh TOTP enrollment material.
    ///
    /// Nothing is persisted yet; the caller proves possession by echoing the
    /// secret plus a valid code to [`Self::enable_totp`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TotpAlreadyEnabled` if the account already has a
    /// secret stored.
    pub fn setup_totp(&self, user: &User) -> Result<TotpSetup, AuthError> {
        if user.totp_enabled {
            return Err(AuthError::TotpAlreadyEnabled);
        }

        let secret = Secret::generate_secret();
        let encoded = secret.to_encoded().to_string();
        let totp = build_totp(&encoded, &user.email)?;

        Ok(TotpSetup {
            secret: encoded,
            otpauth_url: totp.get_url(),
        })
    }

    /// Confirm enrollment: verify a code against the secret, then store it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidTotpCode` if the code doesn't verify.
    pub async fn enable_totp(
        &self,
        user: &User,
        secret: &str,
        code: &str,
    ) -> Result<(), AuthError> {
        if user.totp_enabled {
            return Err(AuthError::TotpAlreadyEnabled);
        }

        verify_totp(secret, &user.email, code)?;
        self.users.set_totp_secret(user.id, secret).await?;

        tracing::info!(user_id = %user.id, "two-factor auth enabled");

        Ok(())
    }

    /// Disable two-factor auth after re-verifying the password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    /// Returns `AuthError::TotpNotEnabled` if no secret is stored.
    pub async fn disable_totp(&self, user: &User, password: &str) -> Result<(), AuthError> {
        if !user.totp_enabled {
            return Err(AuthError::TotpNotEnabled);
        }

        let credentials = self
            .users
            .get_credentials(&user.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        verify_password(password, &credentials.password_hash)?;

        self.users.clear_totp_secret(user.id).await?;

        tracing::info!(user_id = %user.id, "two-factor auth disabled");

        Ok(())
    }

    // =========================================================================
    // Password Reset
    // =========================================================================

    /// Begin a password reset.
    ///
    /// Returns the plaintext token and its expiry for the reset email, or
    /// `None` when no account matches. The HTTP layer responds identically
    /// either way so the endpoint cannot be used to probe for accounts.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if token storage fails.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<(User, String, DateTime<Utc>)>, AuthError> {
        let email = Email::parse(email)?;

        let Some(user) = self.users.get_by_email(&email).await? else {
            return Ok(None);
        };

        let token = generate_reset_token();
        let expires_at = PasswordResetRepository::new(self.pool)
            .create(user.id, &token)
            .await?;

        tracing::info!(user_id = %user.id, "password reset requested");

        Ok(Some((user, token, expires_at)))
    }

    /// Redeem a reset token and set the new password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidResetToken` if the token is unknown,
    /// expired, or already used.
    /// Returns `AuthError::WeakPassword` if the new password doesn't meet
    /// requirements.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<UserId, AuthError> {
        validate_password(new_password)?;
        let password_hash = hash_password(new_password)?;

        let user_id = PasswordResetRepository::new(self.pool)
            .consume(token, &password_hash)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        tracing::info!(user_id = %user_id, "password reset completed");

        Ok(user_id)
    }

    // =========================================================================
    // Bootstrap
    // =========================================================================

    /// Create the initial admin account when none exists.
    ///
    /// Idempotent: does nothing if any admin is already present.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the email is invalid or the insert fails.
    pub async fn bootstrap_admin(&self, bootstrap: &AdminBootstrapConfig) -> Result<(), AuthError> {
        if self.users.admin_exists().await? {
            return Ok(());
        }

        let email = Email::parse(&bootstrap.email)?;
        let password_hash = hash_password(bootstrap.password.expose_secret())?;
        let user = self
            .users
            .create(&email, &password_hash, UserRole::Admin)
            .await?;

        tracing::info!(user_id = %user.id, "bootstrap admin account created");

        Ok(())
    }
}

/// Validate password requirements.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// Public for the CLI's account-management commands.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Build a TOTP generator from a base32 secret.
fn build_totp(encoded_secret: &str, account: &Email) -> Result<TOTP, AuthError> {
    let bytes = Secret::Encoded(encoded_secret.to_string())
        .to_bytes()
        .map_err(|_| AuthError::Totp)?;

    TOTP::new(
        Algorithm::SHA1,
        6,
        1,
        30,
        bytes,
        Some(TOTP_ISSUER.to_string()),
        account.as_str().to_string(),
    )
    .map_err(|_| AuthError::Totp)
}

/// Verify a TOTP code against a stored secret.
fn verify_totp(encoded_secret: &str, account: &Email, code: &str) -> Result<(), AuthError> {
    let totp = build_totp(encoded_secret, account)?;
    let valid = totp.check_current(code).map_err(|_| AuthError::Totp)?;
    if valid {
        Ok(())
    } else {
        Err(AuthError::InvalidTotpCode)
    }
}

/// Generate a random URL-safe reset token.
fn generate_reset_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("long-enough-password").is_ok());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password here", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password_bad_hash() {
        assert!(matches!(
            verify_password("anything-at-all", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_generate_reset_token_is_random_hex() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_totp_round_trip() {
        let email = Email::parse("artist@example.com").unwrap();
        let secret = Secret::generate_secret().to_encoded().to_string();
        let totp = build_totp(&secret, &email).unwrap();
        let code = totp.generate_current().unwrap();
        assert!(verify_totp(&secret, &email, &code).is_ok());
        // Wrong-length codes can never match any window.
        assert!(matches!(
            verify_totp(&secret, &email, "12345"),
            Err(AuthError::InvalidTotpCode)
        ));
    }

    #[test]
    fn test_totp_rejects_bad_secret() {
        let email = Email::parse("artist@example.com").unwrap();
        assert!(matches!(
            build_totp("!!!not-base32!!!", &email),
            Err(AuthError::Totp)
        ));
    }
}
