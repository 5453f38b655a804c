//! # Spotify Integration Module
//!
//! The integration layer between the pipeline and the Spotify Web API. It
//! implements the [`Catalog`](crate::catalog::Catalog) capability trait over
//! HTTP, plus the OAuth flow that produces the tokens the client uses.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Pipeline)
//!          ↓
//! Catalog trait
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 authorization code)
//!     ├── Search (artists, tracks)
//!     ├── Discography (top tracks, albums, album tracks)
//!     └── Playlist Operations (lookup, create, add tracks)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Rate limiting and resilience
//!
//! Every request goes through one retry loop:
//! - **429 Too Many Requests**: the `Retry-After` header is honored with a
//!   sleep-and-retry for delays up to 120 seconds; longer delays surface as
//!   [`CatalogError::RateLimited`](crate::catalog::CatalogError).
//! - **502 Bad Gateway**: retried after a fixed 10 second delay.
//! - Other HTTP errors propagate to the caller, where per-record handling
//!   turns them into summary entries instead of aborting the run.
//!
//! ## API coverage
//!
//! - `GET /me` - current user for playlist creation
//! - `GET /search` - artist and track resolution
//! - `GET /artists/{id}/top-tracks` - popular tier
//! - `GET /artists/{id}/albums`, `GET /albums/{id}/tracks` - deep-cut tier
//! - `GET /me/playlists`, `GET /playlists/{id}/tracks` - reconciliation
//! - `POST /users/{user_id}/playlists`, `POST /playlists/{id}/tracks`
//! - `POST /api/token` - token exchange and refresh
//!
//! ## Authentication
//!
//! [`auth`] implements the OAuth 2.0 authorization-code flow with a client
//! secret: a random `state` parameter, a local callback server, browser
//! launch, and token persistence via the management layer.

pub mod auth;
pub mod client;

pub use client::SpotifyClient;
