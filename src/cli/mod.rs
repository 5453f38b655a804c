//! # CLI Module
//!
//! The command-line interface layer. Each command is a thin front-end over
//! the shared pipeline: it resolves configuration and credentials, parses
//! the input file, and then drives the same resolution, reconciliation and
//! upload functions regardless of which command invoked them.
//!
//! ## Commands
//!
//! - [`auth`] - Initiates the Spotify OAuth authentication flow
//! - [`artists`] - Builds the "most popular" and "deep cuts" playlists from
//!   an artist-list file
//! - [`setlist`] - Builds or idempotently updates today's setlist playlist
//!   from a CSV of artist/song pairs
//!
//! ## Error handling
//!
//! Fatal setup errors (missing file, missing credentials, empty input, no
//! cached token) terminate with exit code 1 before any processing. Every
//! per-query or per-batch failure is converted into a summary entry and the
//! run continues; both flows exit 0 after printing the final report even
//! when individual queries failed.

mod artists;
mod auth;
mod setlist;

pub use artists::{ArtistFlowOptions, artists};
pub use auth::auth;
pub use setlist::setlist;
