//! Integration tests for the artist approval and rejection workflows.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (atelier-cli migrate)
//! - The server running (cargo run -p atelier-server)
//! - An admin account matching `ADMIN_EMAIL` / `ADMIN_PASSWORD`
//!
//! Run with: cargo test -p atelier-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use atelier_integration_tests::support::{
    TEST_PASSWORD, admin_token, approve_artist, base_url, client, login, login_token,
    register_artist,
};

// ============================================================================
// Approval Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_approval_unlocks_login_and_storefront_visibility() {
    let client = client();
    let artist = register_artist(&client, "Approval Flow Artist").await;

    // Pending profiles are invisible on the public storefront.
    let resp = client
        .get(format!("{}/api/artists/{}", base_url(), artist.artist_id))
        .send()
        .await
        .expect("Failed to fetch pending profile");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let admin = admin_token(&client).await;
    approve_artist(&client, &admin, artist.artist_id).await;

    // Approval unlocks login.
    let token = login_token(&client, &artist.email, TEST_PASSWORD).await;
    assert!(!token.is_empty());

    // And the profile becomes public.
    let resp = client
        .get(format!("{}/api/artists/{}", base_url(), artist.artist_id))
        .send()
        .await
        .expect("Failed to fetch approved profile");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse profile");
    assert_eq!(body["approved"], Value::Bool(true));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_pending_artists_visible_in_admin_review_queue() {
    let client = client();
    let artist = register_artist(&client, "Review Queue Artist").await;
    let admin = admin_token(&client).await;

    let resp = client
        .get(format!(
            "{}/api/admin/artists?status=pending&per_page=100",
            base_url()
        ))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to list pending artists");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Vec<Value> = resp.json().await.expect("Failed to parse artist list");
    assert!(
        body.iter()
            .any(|a| a["id"].as_i64() == Some(artist.artist_id)),
        "freshly registered artist should appear in the pending queue"
    );
}

// ============================================================================
// Rejection Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_rejection_removes_account_entirely() {
    let client = client();
    let artist = register_artist(&client, "Rejection Flow Artist").await;
    let admin = admin_token(&client).await;

    let resp = client
        .post(format!(
            "{}/api/admin/artists/{}/reject",
            base_url(),
            artist.artist_id
        ))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to reject artist");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The login row is gone with the profile, so credentials no longer exist.
    let resp = login(&client, &artist.email, TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // And the same email can register from scratch.
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "email": artist.email,
            "password": TEST_PASSWORD,
            "name": "Second Attempt",
        }))
        .send()
        .await
        .expect("Failed to re-register");
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_reject_unknown_artist_not_found() {
    let client = client();
    let admin = admin_token(&client).await;

    let resp = client
        .post(format!("{}/api/admin/artists/2000000/reject", base_url()))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send reject request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Authorization Boundary Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_artist_token_rejected_on_admin_routes() {
    let client = client();
    let artist = register_artist(&client, "Boundary Artist").await;
    let admin = admin_token(&client).await;
    approve_artist(&client, &admin, artist.artist_id).await;
    let token = login_token(&client, &artist.email, TEST_PASSWORD).await;

    let resp = client
        .get(format!("{}/api/admin/orders", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to call admin route");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_portal_rejects_missing_token() {
    let client = client();

    let resp = client
        .get(format!("{}/api/artist/me", base_url()))
        .send()
        .await
        .expect("Failed to call portal");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
