//! Artwork model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use atelier_core::{ArtistId, ArtworkAvailability, ArtworkId};

/// A single artwork belonging to one artist.
#[derive(Debug, Clone, Serialize)]
pub struct Artwork {
    pub id: ArtworkId,
    pub artist_id: ArtistId,
    pub title: String,
    pub description: String,
    pub medium: String,
    /// Free-form dimension text, e.g. "80 x 60 cm".
    pub dimensions: String,
    pub price: Decimal,
    pub availability: ArtworkAvailability,
    /// Path under `/uploads`, when an image has been attached.
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Artwork {
    /// Whether the piece can currently be added to an order.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.availability == ArtworkAvailability::Available
    }
}
