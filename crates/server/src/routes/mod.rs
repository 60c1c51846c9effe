//! HTTP route handlers for the gallery API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (DB ping)
//! GET  /uploads/{file}                  - Static uploaded assets
//!
//! # Auth
//! POST /api/auth/register               - Artist self-registration (pending)
//! POST /api/auth/login                  - Email + password (+ TOTP code)
//! POST /api/auth/password-reset/request - Request reset email (always 204)
//! POST /api/auth/password-reset/confirm - Redeem token, set new password
//! POST /api/auth/2fa/setup              - Generate TOTP secret + otpauth URL
//! POST /api/auth/2fa/enable             - Confirm code, persist secret
//! DELETE /api/auth/2fa                  - Disable two-factor auth
//!
//! # Storefront (public)
//! GET  /api/artists                     - Approved artists (paged)
//! GET  /api/artists/{id}                - Approved artist detail
//! GET  /api/artists/{id}/artworks       - Available artworks for one artist
//! GET  /api/artworks                    - Available artworks (paged, search)
//! GET  /api/artworks/{id}               - Artwork detail
//! POST /api/orders                      - Guest checkout
//!
//! # Artist portal (artist JWT)
//! GET  /api/artist/me                   - Own profile
//! PUT  /api/artist/me                   - Update own profile
//! GET  /api/artist/artworks             - Own artworks (all states)
//! POST /api/artist/artworks             - Create artwork
//! PUT  /api/artist/artworks/{id}        - Update own artwork
//! DELETE /api/artist/artworks/{id}      - Delete own artwork
//! POST /api/artist/media                - Upload media (owned)
//! GET  /api/artist/media                - Own media (paged, search)
//! DELETE /api/artist/media/{id}         - Delete own media
//! GET  /api/artist/notifications        - Notification preferences
//! PUT  /api/artist/notifications        - Update preferences
//! POST /api/artist/deactivate           - Deactivate own account
//!
//! # Admin (admin JWT)
//! GET  /api/admin/artists               - Artists (status filter)
//! POST /api/admin/artists/{id}/approve  - Approve + email
//! POST /api/admin/artists/{id}/reject   - Delete rows + email
//! GET  /api/admin/orders                - Orders (paged, status filter)
//! GET  /api/admin/orders/{id}           - Order with items
//! PATCH /api/admin/orders/{id}/status   - Update order status
//! POST /api/admin/media                 - Upload media (unowned)
//! GET  /api/admin/media                 - Full library (paged, filters)
//! DELETE /api/admin/media/{id}          - Delete row and disk file
//! ```

pub mod admin;
pub mod artist_portal;
pub mod artists;
pub mod artworks;
pub mod auth;
pub mod health;
pub mod orders;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart},
    routing::{delete, get, post, put},
};

use crate::services::uploads::UploadError;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file cap.
///
/// Axum's default body limit (2 MB) would otherwise reject uploads below
/// the configured maximum with a bare 413 before the handler runs.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

fn upload_limit_bytes(max_file_bytes: u64) -> usize {
    usize::try_from(max_file_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

/// A file pulled out of a multipart request.
pub(crate) struct UploadedFile {
    pub original_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Read the first `file` field from a multipart body.
pub(crate) async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile, UploadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Io(std::io::Error::other(e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| UploadError::Io(std::io::Error::other(e)))?
            .to_vec();

        return Ok(UploadedFile {
            original_name,
            content_type,
            data,
        });
    }

    Err(UploadError::MissingFile)
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/password-reset/request",
            post(auth::request_password_reset),
        )
        .route(
            "/password-reset/confirm",
            post(auth::confirm_password_reset),
        )
        .route("/2fa/setup", post(auth::setup_totp))
        .route("/2fa/enable", post(auth::enable_totp))
        .route("/2fa", delete(auth::disable_totp))
}

/// Create the public storefront routes router.
pub fn storefront_routes() -> Router<AppState> {
    Router::new()
        .route("/artists", get(artists::index))
        .route("/artists/{id}", get(artists::show))
        .route("/artists/{id}/artworks", get(artists::artworks))
        .route("/artworks", get(artworks::index))
        .route("/artworks/{id}", get(artworks::show))
        .route("/orders", post(orders::create))
}

/// Create the artist portal routes router.
///
/// `upload_max_bytes` raises the body limit on the media upload route past
/// axum's default so the configured file cap is reachable.
pub fn artist_portal_routes(upload_max_bytes: u64) -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(artist_portal::profile).put(artist_portal::update_profile),
        )
        .route(
            "/artworks",
            get(artist_portal::list_artworks).post(artist_portal::create_artwork),
        )
        .route(
            "/artworks/{id}",
            put(artist_portal::update_artwork).delete(artist_portal::delete_artwork),
        )
        .route(
            "/media",
            get(artist_portal::list_media)
                .post(artist_portal::upload_media)
                .layer(DefaultBodyLimit::max(upload_limit_bytes(upload_max_bytes))),
        )
        .route("/media/{id}", delete(artist_portal::delete_media))
        .route(
            "/notifications",
            get(artist_portal::notifications).put(artist_portal::update_notifications),
        )
        .route("/deactivate", post(artist_portal::deactivate))
}

/// Create the admin routes router.
///
/// `upload_max_bytes` raises the body limit on the media upload route past
/// axum's default so the configured file cap is reachable.
pub fn admin_routes(upload_max_bytes: u64) -> Router<AppState> {
    Router::new()
        .route("/artists", get(admin::list_artists))
        .route("/artists/{id}/approve", post(admin::approve_artist))
        .route("/artists/{id}/reject", post(admin::reject_artist))
        .route("/orders", get(admin::list_orders))
        .route("/orders/{id}", get(admin::show_order))
        .route("/orders/{id}/status", axum::routing::patch(admin::update_order_status))
        .route(
            "/media",
            get(admin::list_media)
                .post(admin::upload_media)
                .layer(DefaultBodyLimit::max(upload_limit_bytes(upload_max_bytes))),
        )
        .route("/media/{id}", delete(admin::delete_media))
}

/// Create all API routes.
pub fn routes(upload_max_bytes: u64) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/api/auth", auth_routes())
        .nest("/api/artist", artist_portal_routes(upload_max_bytes))
        .nest("/api/admin", admin_routes(upload_max_bytes))
        .nest("/api", storefront_routes())
}
