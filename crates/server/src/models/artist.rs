//! Artist profile and notification preference models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use atelier_core::{ArtistId, UserId};

/// An artist profile.
///
/// Exists only while pending (`approved = false`, `approved_at = None`) or
/// approved. Rejection deletes the row together with the backing user.
#[derive(Debug, Clone, Serialize)]
pub struct Artist {
    pub id: ArtistId,
    pub user_id: UserId,
    pub name: String,
    pub bio: String,
    pub statement: String,
    pub website: Option<String>,
    pub approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Artist {
    /// Whether the profile is still awaiting admin review.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !self.approved
    }
}

/// Per-artist email notification switches.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NotificationPreferences {
    pub order_emails: bool,
    pub approval_emails: bool,
    pub marketing_emails: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            order_emails: true,
            approval_emails: true,
            marketing_emails: false,
        }
    }
}
