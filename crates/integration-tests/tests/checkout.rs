//! Integration tests for storefront checkout and order management.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (atelier-cli migrate)
//! - The server running (cargo run -p atelier-server)
//! - An admin account matching `ADMIN_EMAIL` / `ADMIN_PASSWORD`
//!
//! Run with: cargo test -p atelier-integration-tests -- --ignored

use std::str::FromStr;

use reqwest::{Response, StatusCode};
use rust_decimal::Decimal;
use serde_json::{Value, json};

use atelier_integration_tests::support::{
    admin_token, approved_artist, base_url, client, create_artwork,
};

async fn checkout(client: &reqwest::Client, items: Value) -> Response {
    client
        .post(format!("{}/api/orders", base_url()))
        .json(&json!({
            "customer_name": "Integration Buyer",
            "customer_email": "buyer@example.test",
            "shipping_address": "1 Test Lane, Test City",
            "items": items,
        }))
        .send()
        .await
        .expect("Failed to send checkout request")
}

fn decimal_field(value: &Value, field: &str) -> Decimal {
    Decimal::from_str(value[field].as_str().expect("decimal field is a string"))
        .expect("decimal field parses")
}

// ============================================================================
// Checkout Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_freezes_totals_and_marks_artworks_sold() {
    let client = client();
    let (_artist, token) = approved_artist(&client, "Checkout Artist").await;
    let first = create_artwork(&client, &token, "Checkout Piece A", "450").await;
    let second = create_artwork(&client, &token, "Checkout Piece B", "180").await;

    let resp = checkout(
        &client,
        json!([
            { "artwork_id": first, "quantity": 1 },
            { "artwork_id": second, "quantity": 1 },
        ]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse order");
    let total = decimal_field(&body["order"], "total_amount");
    assert_eq!(total, Decimal::from(630), "total is the sum of line prices");

    let items = body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    for item in items {
        assert_eq!(item["quantity"].as_i64(), Some(1));
    }

    // Both originals are off the market.
    for id in [first, second] {
        let resp = client
            .get(format!("{}/api/artworks/{id}", base_url()))
            .send()
            .await
            .expect("Failed to fetch artwork");
        assert_eq!(resp.status(), StatusCode::OK);
        let artwork: Value = resp.json().await.expect("Failed to parse artwork");
        assert_eq!(artwork["availability"].as_str(), Some("sold"));
    }

    // A second buyer cannot purchase a sold piece.
    let resp = checkout(&client, json!([{ "artwork_id": first, "quantity": 1 }])).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_total_survives_later_price_change() {
    let client = client();
    let (_artist, token) = approved_artist(&client, "Price Change Artist").await;
    let artwork = create_artwork(&client, &token, "Reprice Piece", "300").await;

    let resp = checkout(&client, json!([{ "artwork_id": artwork, "quantity": 1 }])).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse order");
    let order_id = body["order"]["id"].as_i64().expect("order id");

    // Artist raises the price after the sale.
    let resp = client
        .put(format!("{}/api/artist/artworks/{artwork}", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Reprice Piece",
            "medium": "Oil on canvas",
            "dimensions": "50 x 40 cm",
            "price": "900",
        }))
        .send()
        .await
        .expect("Failed to update price");
    assert_eq!(resp.status(), StatusCode::OK);

    // The order still carries the price at time of purchase.
    let admin = admin_token(&client).await;
    let resp = client
        .get(format!("{}/api/admin/orders/{order_id}", base_url()))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to fetch order");
    assert_eq!(resp.status(), StatusCode::OK);

    let detail: Value = resp.json().await.expect("Failed to parse order detail");
    assert_eq!(
        decimal_field(&detail["order"], "total_amount"),
        Decimal::from(300)
    );
    let items = detail["items"].as_array().expect("items array");
    assert_eq!(decimal_field(&items[0], "price"), Decimal::from(300));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_rejects_duplicate_lines_for_one_piece() {
    let client = client();
    let (_artist, token) = approved_artist(&client, "Duplicate Line Artist").await;
    let artwork = create_artwork(&client, &token, "Duplicate Line Piece", "200").await;

    // The same original on two lines of one request must not sell twice.
    let resp = checkout(
        &client,
        json!([
            { "artwork_id": artwork, "quantity": 1 },
            { "artwork_id": artwork, "quantity": 1 },
        ]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The rejected checkout rolled back, so the piece is still for sale.
    let resp = client
        .get(format!("{}/api/artworks/{artwork}", base_url()))
        .send()
        .await
        .expect("Failed to fetch artwork");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse artwork");
    assert_eq!(body["availability"].as_str(), Some("available"));

    let resp = checkout(&client, json!([{ "artwork_id": artwork, "quantity": 1 }])).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_sold_artwork_cannot_be_deleted() {
    let client = client();
    let (_artist, token) = approved_artist(&client, "Deletion Artist").await;
    let artwork = create_artwork(&client, &token, "Deletion Piece", "375").await;

    let resp = checkout(&client, json!([{ "artwork_id": artwork, "quantity": 1 }])).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // A sold piece stays on record for its order.
    let resp = client
        .delete(format!("{}/api/artist/artworks/{artwork}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

// ============================================================================
// Validation Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_rejects_empty_and_invalid_requests() {
    let client = client();
    let (_artist, token) = approved_artist(&client, "Validation Artist").await;
    let artwork = create_artwork(&client, &token, "Validation Piece", "100").await;

    // No items.
    let resp = checkout(&client, json!([])).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Zero quantity.
    let resp = checkout(&client, json!([{ "artwork_id": artwork, "quantity": 0 }])).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Unknown artwork.
    let resp = checkout(&client, json!([{ "artwork_id": 2_000_000, "quantity": 1 }])).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Order Management Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_admin_advances_order_status() {
    let client = client();
    let (_artist, token) = approved_artist(&client, "Fulfilment Artist").await;
    let artwork = create_artwork(&client, &token, "Fulfilment Piece", "250").await;

    let resp = checkout(&client, json!([{ "artwork_id": artwork, "quantity": 1 }])).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse order");
    let order_id = body["order"]["id"].as_i64().expect("order id");
    assert_eq!(body["order"]["status"].as_str(), Some("pending"));

    let admin = admin_token(&client).await;
    let resp = client
        .patch(format!("{}/api/admin/orders/{order_id}/status", base_url()))
        .bearer_auth(&admin)
        .json(&json!({ "status": "processing" }))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::OK);

    let order: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(order["status"].as_str(), Some("processing"));
}
