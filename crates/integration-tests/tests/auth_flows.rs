//! Integration tests for registration, login gates, 2FA, and password reset.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (atelier-cli migrate)
//! - The server running (cargo run -p atelier-server)
//! - An admin account matching `ADMIN_EMAIL` / `ADMIN_PASSWORD`
//!
//! Run with: cargo test -p atelier-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use atelier_integration_tests::support::{
    TEST_PASSWORD, approved_artist, base_url, client, login, register_artist,
};

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_duplicate_email_conflict() {
    let client = client();
    let artist = register_artist(&client, "Duplicate Email Artist").await;

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "email": artist.email,
            "password": TEST_PASSWORD,
            "name": "Someone Else",
        }))
        .send()
        .await
        .expect("Failed to send second registration");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_weak_password_rejected() {
    let client = client();

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "email": format!("weak-{}@example.test", Uuid::new_v4()),
            "password": "short",
            "name": "Weak Password Artist",
        }))
        .send()
        .await
        .expect("Failed to send registration");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Login Gate Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_pending_artist_login_forbidden() {
    let client = client();
    let artist = register_artist(&client, "Pending Artist").await;

    let resp = login(&client, &artist.email, TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_wrong_password_unauthorized() {
    let client = client();
    let (artist, _token) = approved_artist(&client, "Wrong Password Artist").await;

    let resp = login(&client, &artist.email, "not-the-password").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_deactivated_account_cannot_login_or_reuse_token() {
    let client = client();
    let (artist, token) = approved_artist(&client, "Deactivating Artist").await;

    let resp = client
        .post(format!("{}/api/artist/deactivate", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to deactivate");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Fresh logins fail.
    let resp = login(&client, &artist.email, TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // The still-valid JWT no longer passes the per-request account check.
    let resp = client
        .get(format!("{}/api/artist/me", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to call portal with stale token");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Two-Factor Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_totp_setup_returns_provisioning_material() {
    let client = client();
    let (_artist, token) = approved_artist(&client, "TOTP Setup Artist").await;

    let resp = client
        .post(format!("{}/api/auth/2fa/setup", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to request TOTP setup");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse setup response");
    assert!(!body["secret"].as_str().expect("secret").is_empty());
    assert!(
        body["otpauth_url"]
            .as_str()
            .expect("otpauth_url")
            .starts_with("otpauth://totp/")
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_totp_enable_rejects_bad_code() {
    let client = client();
    let (artist, token) = approved_artist(&client, "TOTP Bad Code Artist").await;

    let resp = client
        .post(format!("{}/api/auth/2fa/setup", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to request TOTP setup");
    let setup: Value = resp.json().await.expect("Failed to parse setup response");

    // A wrong-length code can never verify, so nothing gets persisted.
    let resp = client
        .post(format!("{}/api/auth/2fa/enable", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "secret": setup["secret"], "code": "12345" }))
        .send()
        .await
        .expect("Failed to send enable request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Enrollment never completed: login still works without a code.
    let resp = login(&client, &artist.email, TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Password Reset Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_password_reset_request_never_reveals_accounts() {
    let client = client();
    let (artist, _token) = approved_artist(&client, "Reset Request Artist").await;

    // Known account.
    let resp = client
        .post(format!("{}/api/auth/password-reset/request", base_url()))
        .json(&json!({ "email": artist.email }))
        .send()
        .await
        .expect("Failed to request reset");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Unknown account gets the identical response.
    let resp = client
        .post(format!("{}/api/auth/password-reset/request", base_url()))
        .json(&json!({ "email": "nobody@example.test" }))
        .send()
        .await
        .expect("Failed to request reset for unknown account");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_password_reset_rejects_unknown_token() {
    let client = client();

    let resp = client
        .post(format!("{}/api/auth/password-reset/confirm", base_url()))
        .json(&json!({
            "token": "0000000000000000000000000000000000000000000000000000000000000000",
            "new_password": "a-perfectly-fine-password",
        }))
        .send()
        .await
        .expect("Failed to send confirm request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
