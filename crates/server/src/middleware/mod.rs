//! Request middleware and extractors.

pub mod auth;

pub use auth::{JwtKeys, RequireAdmin, RequireArtist, RequireUser};
