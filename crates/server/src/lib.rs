//! Atelier gallery server library.
//!
//! Exposes the API as a library so route handlers, repositories, and
//! services can be unit tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
