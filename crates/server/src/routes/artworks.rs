//! Public artwork routes.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use atelier_core::ArtworkId;

use crate::db::ArtworkRepository;
use crate::error::{AppError, Result};
use crate::models::Artwork;
use crate::state::AppState;

/// Catalog listing query: pagination plus a free-text search term.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Matches title and medium, case-insensitive.
    pub search: Option<String>,
}

/// List available artworks.
///
/// GET /api/artworks
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Artwork>>> {
    let artworks = ArtworkRepository::new(state.pool())
        .list_available(
            query.search.as_deref(),
            crate::db::PageParams::new(query.page, query.per_page),
        )
        .await?;

    Ok(Json(artworks))
}

/// Show one artwork.
///
/// GET /api/artworks/{id}
///
/// Sold and reserved pieces stay visible so order confirmations and shared
/// links keep working.
///
/// # Errors
///
/// Returns 404 for unknown artworks.
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Artwork>> {
    let artwork = ArtworkRepository::new(state.pool())
        .get_by_id(ArtworkId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("artwork {id} not found")))?;

    Ok(Json(artwork))
}
