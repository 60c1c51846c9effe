//! Admin back-office routes.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use atelier_core::{ArtistId, MediaFileId, MediaKind, OrderId, OrderStatus};

use crate::db::{
    ArtistRepository, MediaRepository, NotificationPreferencesRepository, OrderRepository,
    PageParams,
};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Artist, MediaFile, Order, OrderItem};
use crate::services::email::log_send_failure;
use crate::state::AppState;

use super::read_file_field;

/// Artist listing query.
#[derive(Debug, Deserialize)]
pub struct ArtistListQuery {
    /// `pending` or `approved`; omitted means everyone.
    pub status: Option<ArtistStatusFilter>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Review-state filter for the artist listing.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtistStatusFilter {
    Pending,
    Approved,
}

/// List artists, optionally filtered by review state.
///
/// GET /api/admin/artists
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn list_artists(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ArtistListQuery>,
) -> Result<Json<Vec<Artist>>> {
    let approved = query.status.map(|s| matches!(s, ArtistStatusFilter::Approved));
    let artists = ArtistRepository::new(state.pool())
        .list(approved, PageParams::new(query.page, query.per_page))
        .await?;

    Ok(Json(artists))
}

/// Approve a pending artist and send the confirmation email.
///
/// POST /api/admin/artists/{id}/approve
///
/// # Errors
///
/// Returns 404 for an unknown artist.
pub async fn approve_artist(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Artist>> {
    let artist_id = ArtistId::new(id);
    let repo = ArtistRepository::new(state.pool());

    let artist = repo.approve(artist_id).await?;

    tracing::info!(artist_id = %artist.id, "artist approved");

    // Notification is best-effort and respects the artist's preferences.
    let wants_email = NotificationPreferencesRepository::new(state.pool())
        .get_or_default(artist_id)
        .await
        .map(|p| p.approval_emails)
        .unwrap_or(true);

    if wants_email {
        match repo.contact_info(artist_id).await {
            Ok(Some(contact)) => {
                if let Err(e) = state
                    .email()
                    .send_artist_approved(&contact.email, &contact.name)
                    .await
                {
                    log_send_failure("artist approval", &e);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "failed to load contact info for approval email"),
        }
    }

    Ok(Json(artist))
}

/// Reject a pending artist: delete the account and send the notice.
///
/// POST /api/admin/artists/{id}/reject
///
/// Contact info is read before the delete; the user row and the cascading
/// artist row are gone by the time the email goes out.
///
/// # Errors
///
/// Returns 404 for an unknown artist.
pub async fn reject_artist(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let artist_id = ArtistId::new(id);
    let repo = ArtistRepository::new(state.pool());

    let contact = repo
        .contact_info(artist_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("artist {id} not found")))?;

    let wants_email = NotificationPreferencesRepository::new(state.pool())
        .get_or_default(artist_id)
        .await
        .map(|p| p.approval_emails)
        .unwrap_or(true);

    repo.delete_with_user(artist_id).await?;

    tracing::info!(artist_id = %artist_id, "artist rejected and removed");

    if wants_email
        && let Err(e) = state
            .email()
            .send_artist_rejected(&contact.email, &contact.name)
            .await
    {
        log_send_failure("artist rejection", &e);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Order listing query.
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// List orders, newest first.
///
/// GET /api/admin/orders
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list(query.status, PageParams::new(query.page, query.per_page))
        .await?;

    Ok(Json(orders))
}

/// An order with its items.
#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Show one order with its items.
///
/// GET /api/admin/orders/{id}
///
/// # Errors
///
/// Returns 404 for an unknown order.
pub async fn show_order(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<OrderDetailResponse>> {
    let (order, items) = OrderRepository::new(state.pool())
        .get_by_id(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(OrderDetailResponse { order, items }))
}

/// Order status update request.
#[derive(Debug, Deserialize)]
pub struct OrderStatusRequest {
    pub status: OrderStatus,
}

/// Update an order's status.
///
/// PATCH /api/admin/orders/{id}/status
///
/// # Errors
///
/// Returns 404 for an unknown order.
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<OrderStatusRequest>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .update_status(OrderId::new(id), body.status)
        .await?;

    tracing::info!(order_id = %order.id, status = %order.status, "order status updated");

    Ok(Json(order))
}

/// Media library query.
#[derive(Debug, Deserialize)]
pub struct MediaListQuery {
    pub search: Option<String>,
    pub kind: Option<MediaKind>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// List the full media library.
///
/// GET /api/admin/media
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn list_media(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<MediaListQuery>,
) -> Result<Json<Vec<MediaFile>>> {
    let media = MediaRepository::new(state.pool())
        .list(
            None,
            query.search.as_deref(),
            query.kind,
            PageParams::new(query.page, query.per_page),
        )
        .await?;

    Ok(Json(media))
}

/// Upload an unowned media file to the library.
///
/// POST /api/admin/media
///
/// # Errors
///
/// Returns 400 for a missing file, oversize payload, or unsupported type.
pub async fn upload_media(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MediaFile>)> {
    let upload = read_file_field(multipart).await?;
    let store = crate::services::uploads::UploadStore::new(&state.config().uploads);
    let stored = store
        .save(&upload.original_name, &upload.content_type, &upload.data)
        .await?;

    let media = MediaRepository::new(state.pool())
        .create(
            None,
            &stored.file_name,
            &upload.original_name,
            &upload.content_type,
            stored.size_bytes,
        )
        .await;

    match media {
        Ok(media) => Ok((StatusCode::CREATED, Json(media))),
        Err(e) => {
            let _ = store.remove(&stored.file_name).await;
            Err(e.into())
        }
    }
}

/// Delete a media file: row and disk bytes.
///
/// DELETE /api/admin/media/{id}
///
/// # Errors
///
/// Returns 404 for an unknown file.
pub async fn delete_media(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let file_name = MediaRepository::new(state.pool())
        .delete(MediaFileId::new(id))
        .await?;

    crate::services::uploads::UploadStore::new(&state.config().uploads)
        .remove(&file_name)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
