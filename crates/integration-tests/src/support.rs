//! Shared helpers for the integration suite.
//!
//! Every helper talks to a running server over HTTP; nothing here touches
//! the database directly, so the tests exercise the same surface a real
//! client would.

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use reqwest::{Client, Response};
use serde_json::{Value, json};
use uuid::Uuid;

/// Password used for every account the suite creates.
pub const TEST_PASSWORD: &str = "integration-pw-1234";

/// Base URL for the API (configurable via environment).
pub fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Plain HTTP client. Auth is bearer-token per request, no cookies.
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// An artist account created by [`register_artist`].
pub struct RegisteredArtist {
    pub email: String,
    pub user_id: i64,
    pub artist_id: i64,
}

/// Register a fresh artist with a unique email. The profile starts pending.
pub async fn register_artist(client: &Client, name: &str) -> RegisteredArtist {
    let email = format!("integration-test-{}@example.test", Uuid::new_v4());
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "email": email,
            "password": TEST_PASSWORD,
            "name": name,
            "bio": "Created by the integration suite.",
            "statement": "",
        }))
        .send()
        .await
        .expect("Failed to register artist");

    assert_eq!(resp.status(), 201, "registration should succeed");
    let body: Value = resp.json().await.expect("Failed to parse registration");

    RegisteredArtist {
        email,
        user_id: body["user"]["id"].as_i64().expect("user id"),
        artist_id: body["artist"]["id"].as_i64().expect("artist id"),
    }
}

/// Attempt a login and return the raw response.
pub async fn login(client: &Client, email: &str, password: &str) -> Response {
    client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request")
}

/// Log in and return the bearer token, asserting success.
pub async fn login_token(client: &Client, email: &str, password: &str) -> String {
    let resp = login(client, email, password).await;
    assert_eq!(resp.status(), 200, "login should succeed for {email}");
    let body: Value = resp.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("token").to_string()
}

/// Token for the admin account named in `ADMIN_EMAIL` / `ADMIN_PASSWORD`.
pub async fn admin_token(client: &Client) -> String {
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.test".to_string());
    let password =
        std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "integration-admin-pw".to_string());
    login_token(client, &email, &password).await
}

/// Approve a pending artist profile as admin.
pub async fn approve_artist(client: &Client, admin_token: &str, artist_id: i64) {
    let resp = client
        .post(format!(
            "{}/api/admin/artists/{artist_id}/approve",
            base_url()
        ))
        .bearer_auth(admin_token)
        .send()
        .await
        .expect("Failed to approve artist");
    assert_eq!(resp.status(), 200, "approval should succeed");
}

/// Register, approve, and log in an artist. Returns the account and token.
pub async fn approved_artist(client: &Client, name: &str) -> (RegisteredArtist, String) {
    let artist = register_artist(client, name).await;
    let admin = admin_token(client).await;
    approve_artist(client, &admin, artist.artist_id).await;
    let token = login_token(client, &artist.email, TEST_PASSWORD).await;
    (artist, token)
}

/// Create an artwork through the portal and return its id.
pub async fn create_artwork(client: &Client, artist_token: &str, title: &str, price: &str) -> i64 {
    let resp = client
        .post(format!("{}/api/artist/artworks", base_url()))
        .bearer_auth(artist_token)
        .json(&json!({
            "title": title,
            "description": "Integration test piece.",
            "medium": "Oil on canvas",
            "dimensions": "50 x 40 cm",
            "price": price,
        }))
        .send()
        .await
        .expect("Failed to create artwork");
    assert_eq!(resp.status(), 201, "artwork creation should succeed");
    let body: Value = resp.json().await.expect("Failed to parse artwork");
    body["id"].as_i64().expect("artwork id")
}
