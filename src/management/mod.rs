//! High-level token management.
//!
//! Wraps the persisted OAuth token with automatic refresh so the Spotify
//! client can ask for a valid access token without caring about expiry.

mod auth;

pub use auth::TokenManager;
