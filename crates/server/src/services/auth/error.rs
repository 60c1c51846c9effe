//! Authentication error types.

use axum::http::StatusCode;
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] atelier_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Artist profile has not been approved yet.
    #[error("account pending review")]
    AccountPending,

    /// Account has been deactivated.
    #[error("account deactivated")]
    AccountDeactivated,

    /// Two-factor auth is enabled and no code was supplied.
    #[error("two-factor code required")]
    TotpRequired,

    /// The supplied two-factor code did not verify.
    #[error("invalid two-factor code")]
    InvalidTotpCode,

    /// Two-factor auth is already enabled.
    #[error("two-factor auth already enabled")]
    TotpAlreadyEnabled,

    /// Two-factor auth is not enabled.
    #[error("two-factor auth not enabled")]
    TotpNotEnabled,

    /// The TOTP secret could not be built or parsed.
    #[error("totp error")]
    Totp,

    /// The reset token is unknown, expired, or already used.
    #[error("invalid reset token")]
    InvalidResetToken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing error.
    #[error("token signing error: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials
            | Self::TotpRequired
            | Self::InvalidTotpCode
            | Self::AccountDeactivated => StatusCode::UNAUTHORIZED,
            Self::AccountPending => StatusCode::FORBIDDEN,
            Self::UserAlreadyExists | Self::TotpAlreadyEnabled => StatusCode::CONFLICT,
            Self::WeakPassword(_)
            | Self::InvalidEmail(_)
            | Self::TotpNotEnabled
            | Self::InvalidResetToken => StatusCode::BAD_REQUEST,
            Self::Repository(_) | Self::PasswordHash | Self::Totp | Self::TokenSigning(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-safe message for this error.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::UserAlreadyExists => "An account with this email already exists".to_string(),
            Self::WeakPassword(msg) => msg.clone(),
            Self::InvalidEmail(_) => "Invalid email address".to_string(),
            Self::AccountPending => "Your account is awaiting review".to_string(),
            Self::AccountDeactivated => "This account has been deactivated".to_string(),
            Self::TotpRequired => "Two-factor code required".to_string(),
            Self::InvalidTotpCode => "Invalid two-factor code".to_string(),
            Self::TotpAlreadyEnabled => "Two-factor auth is already enabled".to_string(),
            Self::TotpNotEnabled => "Two-factor auth is not enabled".to_string(),
            Self::InvalidResetToken => "Invalid or expired reset token".to_string(),
            Self::Repository(_) | Self::PasswordHash | Self::Totp | Self::TokenSigning(_) => {
                "Authentication error".to_string()
            }
        }
    }
}
