//! Integration tests for media uploads and the media library.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (atelier-cli migrate)
//! - The server running (cargo run -p atelier-server)
//! - An admin account matching `ADMIN_EMAIL` / `ADMIN_PASSWORD`
//!
//! Run with: cargo test -p atelier-integration-tests -- --ignored

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use uuid::Uuid;

use atelier_integration_tests::support::{admin_token, approved_artist, base_url, client};

/// A minimal valid PNG header followed by padding up to `size` bytes.
fn png_bytes(size: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; size];
    bytes[..8].copy_from_slice(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    bytes
}

async fn upload(
    client: &Client,
    token: &str,
    path: &str,
    file_name: &str,
    mime: &str,
    bytes: Vec<u8>,
) -> Response {
    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(mime)
        .expect("valid mime type");
    let form = reqwest::multipart::Form::new().part("file", part);

    client
        .post(format!("{}{path}", base_url()))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to send upload")
}

// ============================================================================
// Artist Portal Media Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_artist_upload_list_and_delete() {
    let client = client();
    let (_artist, token) = approved_artist(&client, "Media Artist").await;

    let name = format!("studio-shot-{}.png", Uuid::new_v4());
    let resp = upload(
        &client,
        &token,
        "/api/artist/media",
        &name,
        "image/png",
        png_bytes(16 * 1024),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let media: Value = resp.json().await.expect("Failed to parse media");
    let id = media["id"].as_i64().expect("media id");
    assert_eq!(media["original_name"].as_str(), Some(name.as_str()));
    assert_eq!(media["mime_type"].as_str(), Some("image/png"));
    let file_name = media["file_name"].as_str().expect("file name").to_string();

    // The upload shows up in the artist's own library.
    let resp = client
        .get(format!("{}/api/artist/media?search={name}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list media");
    assert_eq!(resp.status(), StatusCode::OK);
    let listing: Vec<Value> = resp.json().await.expect("Failed to parse listing");
    assert!(listing.iter().any(|m| m["id"].as_i64() == Some(id)));

    // And the bytes are served publicly.
    let resp = client
        .get(format!("{}/uploads/{file_name}", base_url()))
        .send()
        .await
        .expect("Failed to fetch upload");
    assert_eq!(resp.status(), StatusCode::OK);

    // Delete removes the row and the file on disk.
    let resp = client
        .delete(format!("{}/api/artist/media/{id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete media");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{}/uploads/{file_name}", base_url()))
        .send()
        .await
        .expect("Failed to re-fetch upload");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_upload_accepts_files_of_several_megabytes() {
    let client = client();
    let (_artist, token) = approved_artist(&client, "Large Scan Artist").await;

    // A 3 MiB scan is routine for artwork photography and well within the
    // configured cap; it must not be rejected at the transport layer.
    let name = format!("catalog-scan-{}.png", Uuid::new_v4());
    let resp = upload(
        &client,
        &token,
        "/api/artist/media",
        &name,
        "image/png",
        png_bytes(3 * 1024 * 1024),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let media: Value = resp.json().await.expect("Failed to parse media");
    assert_eq!(media["size_bytes"].as_i64(), Some(3 * 1024 * 1024));

    let id = media["id"].as_i64().expect("media id");
    let resp = client
        .delete(format!("{}/api/artist/media/{id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete media");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_upload_rejects_unsupported_type() {
    let client = client();
    let (_artist, token) = approved_artist(&client, "Unsupported Type Artist").await;

    let resp = upload(
        &client,
        &token,
        "/api/artist/media",
        "payload.exe",
        "application/x-msdownload",
        vec![0u8; 1024],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Admin Library Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_admin_uploads_are_unowned_and_filterable() {
    let client = client();
    let admin = admin_token(&client).await;

    let name = format!("press-kit-{}.pdf", Uuid::new_v4());
    let resp = upload(
        &client,
        &admin,
        "/api/admin/media",
        &name,
        "application/pdf",
        vec![b'%'; 4 * 1024],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let media: Value = resp.json().await.expect("Failed to parse media");
    let id = media["id"].as_i64().expect("media id");
    assert!(media["artist_id"].is_null(), "admin uploads have no owner");

    // The document filter finds it; the image filter does not.
    let resp = client
        .get(format!(
            "{}/api/admin/media?search={name}&kind=document",
            base_url()
        ))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to list documents");
    assert_eq!(resp.status(), StatusCode::OK);
    let listing: Vec<Value> = resp.json().await.expect("Failed to parse listing");
    assert!(listing.iter().any(|m| m["id"].as_i64() == Some(id)));

    let resp = client
        .get(format!(
            "{}/api/admin/media?search={name}&kind=image",
            base_url()
        ))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to list images");
    assert_eq!(resp.status(), StatusCode::OK);
    let listing: Vec<Value> = resp.json().await.expect("Failed to parse listing");
    assert!(listing.iter().all(|m| m["id"].as_i64() != Some(id)));

    let resp = client
        .delete(format!("{}/api/admin/media/{id}", base_url()))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to delete media");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
