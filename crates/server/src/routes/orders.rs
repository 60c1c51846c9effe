//! Guest checkout route.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use atelier_core::{ArtworkId, Email};

use crate::db::ArtworkRepository;
use crate::db::orders::{CheckoutLine, CustomerInfo, OrderRepository};
use crate::error::{AppError, Result};
use crate::models::{Order, OrderItem};
use crate::services::email::log_send_failure;
use crate::state::AppState;

/// One requested checkout line.
#[derive(Debug, Deserialize)]
pub struct CheckoutItemRequest {
    pub artwork_id: i32,
    pub quantity: i32,
}

/// Guest checkout request.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub shipping_address: String,
    pub items: Vec<CheckoutItemRequest>,
}

/// Checkout response: the created order with its frozen items.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Create an order from a guest checkout.
///
/// POST /api/orders
///
/// Validates every artwork is still available, freezes prices into the
/// items, computes `total_amount`, and marks the pieces sold, all in one
/// transaction. The receipt email is best-effort after commit.
///
/// # Errors
///
/// Returns 400 for an empty cart or invalid input, 404 for an unknown
/// artwork, 409 when a piece is no longer available.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>)> {
    if body.items.is_empty() {
        return Err(AppError::BadRequest("order has no items".to_string()));
    }
    if body.customer_name.trim().is_empty() || body.shipping_address.trim().is_empty() {
        return Err(AppError::BadRequest(
            "customer name and shipping address are required".to_string(),
        ));
    }
    let email = Email::parse(&body.customer_email)
        .map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;

    let mut lines = Vec::with_capacity(body.items.len());
    for item in &body.items {
        if item.quantity < 1 {
            return Err(AppError::BadRequest(
                "item quantity must be at least 1".to_string(),
            ));
        }
        lines.push(CheckoutLine {
            artwork_id: ArtworkId::new(item.artwork_id),
            quantity: item.quantity,
        });
    }

    let customer = CustomerInfo {
        name: body.customer_name.clone(),
        email: email.as_str().to_string(),
        shipping_address: body.shipping_address.clone(),
    };

    let (order, items) = OrderRepository::new(state.pool())
        .create_checkout(&customer, &lines)
        .await?;

    tracing::info!(order_id = %order.id, total = %order.total_amount, "order created");

    // Receipt is best-effort: the committed order stands either way.
    send_receipt(&state, &order, &items).await;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse { order, items }),
    ))
}

/// Resolve item titles and send the receipt email.
async fn send_receipt(state: &AppState, order: &Order, items: &[OrderItem]) {
    let artworks = ArtworkRepository::new(state.pool());
    let mut titled = Vec::with_capacity(items.len());
    for item in items {
        let title = match artworks.get_by_id(item.artwork_id).await {
            Ok(Some(artwork)) => artwork.title,
            Ok(None) => format!("Artwork #{}", item.artwork_id),
            Err(e) => {
                tracing::warn!(error = %e, "failed to resolve artwork title for receipt");
                format!("Artwork #{}", item.artwork_id)
            }
        };
        titled.push((item.clone(), title));
    }

    if let Err(e) = state.email().send_order_receipt(order, &titled).await {
        log_send_failure("order receipt", &e);
    }
}
