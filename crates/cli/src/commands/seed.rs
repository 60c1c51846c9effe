//! Seed the database with a demo artist and catalog for local development.
//!
//! # Usage
//!
//! ```bash
//! atelier-cli seed
//! ```
//!
//! Creates an approved artist account (`artist@example.test`, password
//! `seeded-artist-password`) with a handful of available artworks. Running
//! twice is a no-op: seeding is skipped when the account already exists.

use rust_decimal::Decimal;

use atelier_core::{Email, UserRole};
use atelier_server::db::artworks::ArtworkFields;
use atelier_server::db::{ArtistRepository, ArtworkRepository, UserRepository};
use atelier_server::services::auth::hash_password;

use super::CliError;

const SEED_EMAIL: &str = "artist@example.test";
const SEED_PASSWORD: &str = "seeded-artist-password";

/// Seed a demo artist and a small catalog.
///
/// # Errors
///
/// Returns `CliError` if any insert fails.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    let email = Email::parse(SEED_EMAIL)?;
    let users = UserRepository::new(&pool);

    if users.get_by_email(&email).await?.is_some() {
        tracing::info!("Seed data already present, nothing to do");
        return Ok(());
    }

    let password_hash = hash_password(SEED_PASSWORD)?;
    let user = users
        .create(&email, &password_hash, UserRole::Artist)
        .await?;

    let artists = ArtistRepository::new(&pool);
    let artist = artists
        .create(
            user.id,
            "Vera Lindqvist",
            "Painter working in oil and cold wax, based in Malmö.",
            "My work explores coastlines as remembered rather than seen.",
            Some("https://example.test/vera"),
        )
        .await?;
    let artist = artists.approve(artist.id).await?;

    let artworks = ArtworkRepository::new(&pool);
    let pieces: [(&str, &str, &str, &str, i64); 3] = [
        (
            "Northern Shore",
            "Oil and cold wax on panel.",
            "Oil on panel",
            "80 x 60 cm",
            450,
        ),
        (
            "Breakwater II",
            "Second in the breakwater series.",
            "Oil on canvas",
            "100 x 70 cm",
            600,
        ),
        (
            "Tidal Study",
            "Small study in blues and greys.",
            "Watercolour",
            "30 x 21 cm",
            180,
        ),
    ];

    for (title, description, medium, dimensions, price) in pieces {
        artworks
            .create(
                artist.id,
                &ArtworkFields {
                    title: title.to_string(),
                    description: description.to_string(),
                    medium: medium.to_string(),
                    dimensions: dimensions.to_string(),
                    price: Decimal::from(price),
                    image_path: None,
                },
            )
            .await?;
    }

    tracing::info!(
        "Seeded approved artist {} with {} artworks (password: {})",
        SEED_EMAIL,
        pieces.len(),
        SEED_PASSWORD
    );

    Ok(())
}
