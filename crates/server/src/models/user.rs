//! User account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use atelier_core::{Email, UserId, UserRole};

/// An authenticated account (admin or artist login).
///
/// The password hash and TOTP secret never leave the database layer; this
/// struct is safe to serialize into API responses.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
    /// Whether TOTP two-factor auth is enrolled.
    pub totp_enabled: bool,
    /// Deactivated accounts keep their rows but cannot authenticate.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
