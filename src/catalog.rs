//! Capability interface over the remote music catalog.
//!
//! The pipeline stages (resolver, selector, reconciler, uploader) are generic
//! over the [`Catalog`] trait instead of talking to the Spotify client
//! directly. The real implementation is
//! [`SpotifyClient`](crate::spotify::SpotifyClient); tests drive the same
//! stages against an in-memory fake, without any network access.

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{AlbumObject, ArtistObject, PlaylistObject, SimpleTrack, TrackObject};

/// Errors surfaced by catalog operations.
///
/// Per-query resolution misses are not errors (they become
/// `MatchKind::NotFound`); this taxonomy covers transport and provider
/// failures that the caller either retries or records as a partial failure.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The provider throttled us and the transport-level wait was exhausted.
    #[error("rate limited by provider (retry after {0}s)")]
    RateLimited(u64),

    /// HTTP transport or deserialization failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered but the response was not usable.
    #[error("provider error: {0}")]
    Provider(String),
}

/// Operations the pipeline needs from a music catalog provider.
///
/// Search operations return raw hits; interpretation (exact vs. fallback
/// match, tier partitioning, dedup) lives in the pipeline so that it is
/// identical for every implementation.
pub trait Catalog {
    /// ID of the authenticated user, needed for playlist creation.
    async fn current_user_id(&self) -> Result<String, CatalogError>;

    /// Targeted artist search; returns the top hit, if any.
    async fn search_artist(&self, name: &str) -> Result<Option<ArtistObject>, CatalogError>;

    /// Targeted track search with quoted artist and track fields.
    async fn search_track_exact(
        &self,
        artist: &str,
        song: &str,
    ) -> Result<Vec<TrackObject>, CatalogError>;

    /// Broad free-text track search used when the targeted search is empty.
    async fn search_track_free(
        &self,
        artist: &str,
        song: &str,
    ) -> Result<Vec<TrackObject>, CatalogError>;

    /// The artist's top tracks in the given market, provider popularity order.
    async fn artist_top_tracks(
        &self,
        artist_id: &str,
        country: &str,
    ) -> Result<Vec<TrackObject>, CatalogError>;

    /// The artist's albums in provider-default order.
    async fn artist_albums(&self, artist_id: &str) -> Result<Vec<AlbumObject>, CatalogError>;

    /// Track listing of one album, listing order.
    async fn album_tracks(&self, album_id: &str) -> Result<Vec<SimpleTrack>, CatalogError>;

    /// Looks up a playlist owned by the current user by exact name.
    async fn find_playlist_by_name(
        &self,
        name: &str,
    ) -> Result<Option<PlaylistObject>, CatalogError>;

    /// Creates a public playlist and returns it.
    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<PlaylistObject, CatalogError>;

    /// All track IDs currently in the playlist.
    async fn playlist_track_ids(&self, playlist_id: &str)
    -> Result<HashSet<String>, CatalogError>;

    /// Appends the given tracks to the playlist. Callers chunk to the
    /// provider limit of 100 before calling.
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String])
    -> Result<(), CatalogError>;
}
