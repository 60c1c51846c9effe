//! Integration tests for Atelier.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! atelier-cli migrate
//!
//! # Create the admin account the tests authenticate as
//! atelier-cli admin create -e admin@example.test -p 'integration-admin-pw'
//!
//! # Start the server
//! cargo run -p atelier-server
//!
//! # Run the ignored integration suite
//! cargo test -p atelier-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `API_BASE_URL` - base URL of the running server (default `http://localhost:3000`)
//! - `ADMIN_EMAIL` / `ADMIN_PASSWORD` - credentials of an existing admin account
//!
//! # Test Categories
//!
//! - `auth_flows` - registration, login gates, 2FA, password reset
//! - `artist_lifecycle` - approval and rejection workflows
//! - `checkout` - storefront orders and availability transitions

pub mod support;
