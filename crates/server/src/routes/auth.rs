//! Authentication routes: registration, login, password reset, 2FA.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::{Artist, User};
use crate::services::auth::{ArtistRegistration, AuthService, TotpSetup};
use crate::services::email::log_send_failure;
use crate::state::AppState;

/// Artist self-registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub statement: String,
    pub website: Option<String>,
}

/// Registration response: the pending profile, no token.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub artist: Artist,
}

/// Register a new artist account with a pending profile.
///
/// POST /api/auth/register
///
/// # Errors
///
/// Returns 400 for invalid email/password, 409 for a duplicate email.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let auth = AuthService::new(state.pool(), state.jwt());
    let (user, artist) = auth
        .register_artist(ArtistRegistration {
            email: &body.email,
            password: &body.password,
            name: &body.name,
            bio: &body.bio,
            statement: &body.statement,
            website: body.website.as_deref(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user, artist })))
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Required once two-factor auth is enrolled.
    pub totp_code: Option<String>,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Login with email, password, and (when enrolled) a TOTP code.
///
/// POST /api/auth/login
///
/// # Errors
///
/// Returns 401 for bad credentials or missing/invalid TOTP code, 403 for a
/// pending artist.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.pool(), state.jwt());
    let outcome = auth
        .login(&body.email, &body.password, body.totp_code.as_deref())
        .await?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        user: outcome.user,
    }))
}

/// Password reset request.
#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Request a password reset email.
///
/// POST /api/auth/password-reset/request
///
/// Always returns 204, whether or not the account exists, so the endpoint
/// cannot be used to probe for registered emails.
///
/// # Errors
///
/// Returns 500 only if token storage fails.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetRequest>,
) -> Result<StatusCode> {
    let auth = AuthService::new(state.pool(), state.jwt());

    // An invalid email format gets the same 204 as an unknown account.
    let requested = match auth.request_password_reset(&body.email).await {
        Ok(outcome) => outcome,
        Err(crate::services::auth::AuthError::InvalidEmail(_)) => None,
        Err(e) => return Err(e.into()),
    };

    if let Some((user, token, expires_at)) = requested {
        let valid_hours = (expires_at - chrono::Utc::now()).num_hours().max(1);
        if let Err(e) = state
            .email()
            .send_password_reset(user.email.as_str(), &token, valid_hours)
            .await
        {
            log_send_failure("password reset", &e);
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Password reset confirmation.
#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

/// Redeem a reset token and set the new password.
///
/// POST /api/auth/password-reset/confirm
///
/// # Errors
///
/// Returns 400 for an unknown, expired, or already-used token, or a weak
/// password.
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetConfirm>,
) -> Result<StatusCode> {
    let auth = AuthService::new(state.pool(), state.jwt());
    auth.reset_password(&body.token, &body.new_password).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// TOTP enrollment material.
#[derive(Debug, Serialize)]
pub struct TotpSetupResponse {
    pub secret: String,
    pub otpauth_url: String,
}

impl From<TotpSetup> for TotpSetupResponse {
    fn from(setup: TotpSetup) -> Self {
        Self {
            secret: setup.secret,
            otpauth_url: setup.otpauth_url,
        }
    }
}

/// Generate a TOTP secret and provisioning URL.
///
/// POST /api/auth/2fa/setup
///
/// Nothing is persisted until the code is confirmed via `enable`.
///
/// # Errors
///
/// Returns 409 if two-factor auth is already enabled.
pub async fn setup_totp(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<TotpSetupResponse>> {
    let auth = AuthService::new(state.pool(), state.jwt());
    let setup = auth.setup_totp(&user)?;

    Ok(Json(setup.into()))
}

/// TOTP enable request: the secret from setup plus a current code.
#[derive(Debug, Deserialize)]
pub struct TotpEnableRequest {
    pub secret: String,
    pub code: String,
}

/// Confirm a TOTP code and persist the secret.
///
/// POST /api/auth/2fa/enable
///
/// # Errors
///
/// Returns 401 if the code doesn't verify, 409 if already enabled.
pub async fn enable_totp(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<TotpEnableRequest>,
) -> Result<StatusCode> {
    let auth = AuthService::new(state.pool(), state.jwt());
    auth.enable_totp(&user, &body.secret, &body.code).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// TOTP disable request: password re-verification.
#[derive(Debug, Deserialize)]
pub struct TotpDisableRequest {
    pub password: String,
}

/// Disable two-factor auth.
///
/// DELETE /api/auth/2fa
///
/// # Errors
///
/// Returns 401 if the password is wrong, 400 if not enabled.
pub async fn disable_totp(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<TotpDisableRequest>,
) -> Result<StatusCode> {
    let auth = AuthService::new(state.pool(), state.jwt());
    auth.disable_totp(&user, &body.password).await?;

    Ok(StatusCode::NO_CONTENT)
}
