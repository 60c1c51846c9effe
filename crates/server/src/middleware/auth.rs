//! Bearer token authentication: signing keys, claims, and extractors.
//!
//! Handlers take `RequireAdmin` or `RequireArtist` as arguments; both verify
//! the `Authorization: Bearer` token and then re-check the account against
//! the database, so a revoked or rejected account cannot keep using a token
//! issued before the change.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use atelier_core::{UserId, UserRole};

use crate::config::JwtConfig;
use crate::db::{ArtistRepository, UserRepository};
use crate::error::AppError;
use crate::models::artist::Artist;
use crate::models::user::User;
use crate::state::AppState;

/// JWT claims carried by access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: i32,
    /// Account role at signing time.
    pub role: UserRole,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Issuer.
    pub iss: String,
}

/// HMAC signing and verification keys derived from configuration.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl_minutes: u64,
}

impl JwtKeys {
    /// Build keys from the JWT configuration.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            ttl_minutes: config.ttl_minutes,
        }
    }

    /// Sign an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if token encoding fails.
    pub fn sign(&self, user_id: UserId, role: UserRole) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        #[allow(clippy::cast_possible_wrap)]
        let exp = now + chrono::Duration::minutes(self.ttl_minutes as i64);
        let claims = Claims {
            sub: user_id.as_i32(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid, expired, or from another
    /// issuer.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

/// Pull and verify the bearer token from request headers.
fn verify_bearer(parts: &Parts, state: &AppState) -> Result<Claims, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    state.jwt().verify(token).map_err(|e| {
        tracing::debug!(error = %e, "token verification failed");
        AppError::Unauthorized("Invalid or expired token".to_string())
    })
}

/// Extractor that requires an active admin account.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {}", admin.email)
/// }
/// ```
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_bearer(parts, state)?;
        if claims.role != UserRole::Admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let user = UserRepository::new(state.pool())
            .get_by_id(UserId::new(claims.sub))
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

        if user.role != UserRole::Admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        if !user.active {
            return Err(AppError::Unauthorized("Account is deactivated".to_string()));
        }

        crate::error::set_sentry_user(&user.id, Some(user.email.as_str()));

        Ok(Self(user))
    }
}

/// Extractor that requires any active account, admin or artist.
///
/// Used by the two-factor endpoints, which are role-agnostic.
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_bearer(parts, state)?;

        let user = UserRepository::new(state.pool())
            .get_by_id(UserId::new(claims.sub))
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

        if !user.active {
            return Err(AppError::Unauthorized("Account is deactivated".to_string()));
        }

        crate::error::set_sentry_user(&user.id, Some(user.email.as_str()));

        Ok(Self(user))
    }
}

/// The authenticated artist: account plus profile.
pub struct ArtistIdentity {
    pub user: User,
    pub artist: Artist,
}

/// Extractor that requires an approved, active artist account.
pub struct RequireArtist(pub ArtistIdentity);

impl FromRequestParts<AppState> for RequireArtist {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_bearer(parts, state)?;
        if claims.role != UserRole::Artist {
            return Err(AppError::Forbidden("Artist access required".to_string()));
        }

        let user_id = UserId::new(claims.sub);
        let user = UserRepository::new(state.pool())
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

        if !user.active {
            return Err(AppError::Unauthorized("Account is deactivated".to_string()));
        }

        let artist = ArtistRepository::new(state.pool())
            .get_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

        if !artist.approved {
            return Err(AppError::Forbidden(
                "Artist profile is pending review".to_string(),
            ));
        }

        crate::error::set_sentry_user(&user.id, Some(user.email.as_str()));

        Ok(Self(ArtistIdentity { user, artist }))
    }
}
