//! # API Module
//!
//! HTTP endpoints for the local callback server used during authentication.
//!
//! - [`callback`] - Handles the OAuth redirect from Spotify's authorization
//!   server, verifies the `state` parameter and exchanges the authorization
//!   code for an access token.
//! - [`health`] - Health check returning application status and version.
//!
//! Built on [Axum](https://docs.rs/axum); the callback shares its result
//! with the waiting `auth` command through an `Arc<Mutex<Option<AuthState>>>`
//! extension.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
