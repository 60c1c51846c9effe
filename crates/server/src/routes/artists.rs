//! Public artist routes.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use atelier_core::ArtistId;

use crate::db::{ArtistRepository, ArtworkRepository, PageParams};
use crate::error::{AppError, Result};
use crate::models::{Artist, Artwork};
use crate::state::AppState;

/// Shared pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<&PageQuery> for PageParams {
    fn from(query: &PageQuery) -> Self {
        Self::new(query.page, query.per_page)
    }
}

/// List approved artists.
///
/// GET /api/artists
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Artist>>> {
    let artists = ArtistRepository::new(state.pool())
        .list(Some(true), (&query).into())
        .await?;

    Ok(Json(artists))
}

/// Show one approved artist.
///
/// GET /api/artists/{id}
///
/// # Errors
///
/// Returns 404 for unknown or still-pending artists.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Artist>> {
    let artist = ArtistRepository::new(state.pool())
        .get_by_id(ArtistId::new(id))
        .await?
        .filter(|a| a.approved)
        .ok_or_else(|| AppError::NotFound(format!("artist {id} not found")))?;

    Ok(Json(artist))
}

/// List one artist's available artworks.
///
/// GET /api/artists/{id}/artworks
///
/// # Errors
///
/// Returns 404 for unknown or still-pending artists.
pub async fn artworks(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Artwork>>> {
    let artist_id = ArtistId::new(id);

    // Pending artists are invisible to the storefront.
    ArtistRepository::new(state.pool())
        .get_by_id(artist_id)
        .await?
        .filter(|a| a.approved)
        .ok_or_else(|| AppError::NotFound(format!("artist {id} not found")))?;

    let artworks = ArtworkRepository::new(state.pool())
        .list_by_artist(artist_id, true, (&query).into())
        .await?;

    Ok(Json(artworks))
}
