//! Artist portal routes.
//!
//! Everything here runs behind [`RequireArtist`], which re-checks approval
//! and active status on every request. Ownership of artworks and media is
//! enforced at the query level (`WHERE ... AND artist_id = $n`).

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use atelier_core::{ArtworkAvailability, ArtworkId, MediaFileId};

use crate::db::artworks::{ArtworkFields, ArtworkRepository};
use crate::db::{MediaRepository, NotificationPreferencesRepository, PageParams, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireArtist;
use crate::models::{Artist, Artwork, MediaFile, NotificationPreferences};
use crate::services::uploads::UploadStore;
use crate::state::AppState;

use super::read_file_field;

/// Get the authenticated artist's profile.
///
/// GET /api/artist/me
pub async fn profile(RequireArtist(identity): RequireArtist) -> Json<Artist> {
    Json(identity.artist)
}

/// Profile update request.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub statement: String,
    pub website: Option<String>,
}

/// Update the authenticated artist's profile.
///
/// PUT /api/artist/me
///
/// # Errors
///
/// Returns 400 for an empty name.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireArtist(identity): RequireArtist,
    Json(body): Json<ProfileUpdateRequest>,
) -> Result<Json<Artist>> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let artist = crate::db::ArtistRepository::new(state.pool())
        .update_profile(
            identity.artist.id,
            &body.name,
            &body.bio,
            &body.statement,
            body.website.as_deref(),
        )
        .await?;

    Ok(Json(artist))
}

/// Pagination query for portal listings.
#[derive(Debug, Deserialize)]
pub struct PortalPageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
}

/// List all of the artist's artworks, sold and reserved included.
///
/// GET /api/artist/artworks
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn list_artworks(
    State(state): State<AppState>,
    RequireArtist(identity): RequireArtist,
    Query(query): Query<PortalPageQuery>,
) -> Result<Json<Vec<Artwork>>> {
    let artworks = ArtworkRepository::new(state.pool())
        .list_by_artist(
            identity.artist.id,
            false,
            PageParams::new(query.page, query.per_page),
        )
        .await?;

    Ok(Json(artworks))
}

/// Artwork create/update request.
#[derive(Debug, Deserialize)]
pub struct ArtworkRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub dimensions: String,
    pub price: Decimal,
    pub image_path: Option<String>,
    /// Optional availability override on update (e.g. marking a piece
    /// reserved for a studio sale).
    pub availability: Option<ArtworkAvailability>,
}

fn validate_artwork(body: &ArtworkRequest) -> Result<ArtworkFields> {
    if body.title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required".to_string()));
    }
    if body.price < Decimal::ZERO {
        return Err(AppError::BadRequest("price cannot be negative".to_string()));
    }

    Ok(ArtworkFields {
        title: body.title.clone(),
        description: body.description.clone(),
        medium: body.medium.clone(),
        dimensions: body.dimensions.clone(),
        price: body.price,
        image_path: body.image_path.clone(),
    })
}

/// Create an artwork.
///
/// POST /api/artist/artworks
///
/// # Errors
///
/// Returns 400 for invalid fields.
pub async fn create_artwork(
    State(state): State<AppState>,
    RequireArtist(identity): RequireArtist,
    Json(body): Json<ArtworkRequest>,
) -> Result<(StatusCode, Json<Artwork>)> {
    let fields = validate_artwork(&body)?;
    let artwork = ArtworkRepository::new(state.pool())
        .create(identity.artist.id, &fields)
        .await?;

    tracing::info!(artwork_id = %artwork.id, artist_id = %identity.artist.id, "artwork created");

    Ok((StatusCode::CREATED, Json(artwork)))
}

/// Update an owned artwork.
///
/// PUT /api/artist/artworks/{id}
///
/// # Errors
///
/// Returns 404 if the artwork doesn't exist or belongs to another artist.
pub async fn update_artwork(
    State(state): State<AppState>,
    RequireArtist(identity): RequireArtist,
    Path(id): Path<i32>,
    Json(body): Json<ArtworkRequest>,
) -> Result<Json<Artwork>> {
    let fields = validate_artwork(&body)?;
    let repo = ArtworkRepository::new(state.pool());

    // Ownership is proven by the update's WHERE clause before any
    // availability change is applied.
    let mut artwork = repo
        .update(ArtworkId::new(id), identity.artist.id, &fields)
        .await?;

    if let Some(availability) = body.availability
        && availability != artwork.availability
    {
        artwork = repo.set_availability(artwork.id, availability).await?;
    }

    Ok(Json(artwork))
}

/// Delete an owned artwork.
///
/// DELETE /api/artist/artworks/{id}
///
/// # Errors
///
/// Returns 404 if the artwork doesn't exist or belongs to another artist.
pub async fn delete_artwork(
    State(state): State<AppState>,
    RequireArtist(identity): RequireArtist,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    ArtworkRepository::new(state.pool())
        .delete(ArtworkId::new(id), identity.artist.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Upload a media file owned by the artist.
///
/// POST /api/artist/media
///
/// # Errors
///
/// Returns 400 for a missing file, oversize payload, or unsupported type.
pub async fn upload_media(
    State(state): State<AppState>,
    RequireArtist(identity): RequireArtist,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MediaFile>)> {
    let upload = read_file_field(multipart).await?;
    let store = UploadStore::new(&state.config().uploads);
    let stored = store
        .save(&upload.original_name, &upload.content_type, &upload.data)
        .await?;

    let media = MediaRepository::new(state.pool())
        .create(
            Some(identity.artist.id),
            &stored.file_name,
            &upload.original_name,
            &upload.content_type,
            stored.size_bytes,
        )
        .await;

    match media {
        Ok(media) => Ok((StatusCode::CREATED, Json(media))),
        Err(e) => {
            // Keep disk and database in sync when the insert fails.
            let _ = store.remove(&stored.file_name).await;
            Err(e.into())
        }
    }
}

/// List the artist's own media.
///
/// GET /api/artist/media
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn list_media(
    State(state): State<AppState>,
    RequireArtist(identity): RequireArtist,
    Query(query): Query<PortalPageQuery>,
) -> Result<Json<Vec<MediaFile>>> {
    let media = MediaRepository::new(state.pool())
        .list(
            Some(identity.artist.id),
            query.search.as_deref(),
            None,
            PageParams::new(query.page, query.per_page),
        )
        .await?;

    Ok(Json(media))
}

/// Delete an owned media file (row and bytes).
///
/// DELETE /api/artist/media/{id}
///
/// # Errors
///
/// Returns 404 if the file doesn't exist or belongs to someone else.
pub async fn delete_media(
    State(state): State<AppState>,
    RequireArtist(identity): RequireArtist,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let file_name = MediaRepository::new(state.pool())
        .delete_owned(MediaFileId::new(id), identity.artist.id)
        .await?;

    UploadStore::new(&state.config().uploads)
        .remove(&file_name)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Get notification preferences.
///
/// GET /api/artist/notifications
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn notifications(
    State(state): State<AppState>,
    RequireArtist(identity): RequireArtist,
) -> Result<Json<NotificationPreferences>> {
    let prefs = NotificationPreferencesRepository::new(state.pool())
        .get_or_default(identity.artist.id)
        .await?;

    Ok(Json(prefs))
}

/// Notification preferences update request.
#[derive(Debug, Deserialize)]
pub struct NotificationUpdateRequest {
    pub order_emails: bool,
    pub approval_emails: bool,
    pub marketing_emails: bool,
}

/// Replace notification preferences.
///
/// PUT /api/artist/notifications
///
/// # Errors
///
/// Returns 500 if the upsert fails.
pub async fn update_notifications(
    State(state): State<AppState>,
    RequireArtist(identity): RequireArtist,
    Json(body): Json<NotificationUpdateRequest>,
) -> Result<Json<NotificationPreferences>> {
    let prefs = NotificationPreferencesRepository::new(state.pool())
        .upsert(
            identity.artist.id,
            &NotificationPreferences {
                order_emails: body.order_emails,
                approval_emails: body.approval_emails,
                marketing_emails: body.marketing_emails,
            },
        )
        .await?;

    Ok(Json(prefs))
}

/// Deactivate the artist's own account.
///
/// POST /api/artist/deactivate
///
/// The profile and artworks stay in place; the account simply can no
/// longer authenticate until an admin reactivates it.
///
/// # Errors
///
/// Returns 500 if the update fails.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireArtist(identity): RequireArtist,
) -> Result<StatusCode> {
    UserRepository::new(state.pool())
        .set_active(identity.user.id, false)
        .await?;

    tracing::info!(user_id = %identity.user.id, "artist deactivated own account");

    Ok(StatusCode::NO_CONTENT)
}
