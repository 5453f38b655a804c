use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

// --- OAuth / token types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Shared state between the auth command and the callback handler. The
/// `state` field is the random OAuth state parameter; the callback rejects
/// requests that echo a different value.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub state: String,
    pub token: Option<Token>,
}

// --- Domain model ---

/// A single parsed input query: either an artist name from the artist-list
/// file, or an exact artist/song pair from a setlist CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRecord {
    ArtistOnly { artist: String },
    ArtistSong { artist: String, song: String },
}

impl QueryRecord {
    /// Human-readable label for status lines, e.g. `Miles Davis - All Blues`.
    pub fn label(&self) -> String {
        match self {
            QueryRecord::ArtistOnly { artist } => artist.clone(),
            QueryRecord::ArtistSong { artist, song } => format!("{} - {}", artist, song),
        }
    }
}

/// How a query was matched against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The targeted search hit, with the returned name matching the query.
    Exact,
    /// The broader fallback search produced a usable top hit.
    Fallback,
    /// Neither search produced any hit. Recorded, never raised.
    NotFound,
}

/// Resolution outcome for one [`QueryRecord`]. An absent `catalog_id`
/// signals an unresolved query and always pairs with `MatchKind::NotFound`.
#[derive(Debug, Clone)]
pub struct ResolvedEntity {
    pub query: QueryRecord,
    pub catalog_id: Option<String>,
    pub match_kind: MatchKind,
    /// The name the catalog returned for the hit, for user feedback.
    pub matched: Option<String>,
}

/// Ranked track picks for one resolved artist. The deep-cut tier never
/// contains a track that is already in the popular tier.
#[derive(Debug, Clone, Default)]
pub struct TrackSelection {
    pub artist_id: String,
    pub popular: Vec<String>,
    pub deep_cuts: Vec<String>,
}

/// A playlist to write into. `id` is absent until the playlist exists
/// remotely; `existing` is fetched once per run and read-only afterwards.
#[derive(Debug, Clone)]
pub struct PlaylistTarget {
    pub id: Option<String>,
    pub name: String,
    pub existing: HashSet<String>,
}

/// The delta to apply to a playlist: which track IDs to add (first-seen
/// order, no duplicates, disjoint from the target's existing set) and how
/// many desired tracks were skipped because they were already present.
#[derive(Debug, Clone)]
pub struct ReconciliationPlan {
    pub target: PlaylistTarget,
    pub to_add: Vec<String>,
    pub already_present: usize,
}

/// Result of pushing a track list through the batch uploader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub applied: usize,
    pub failed_chunks: usize,
}

/// One line of the final per-query report table.
#[derive(Tabled)]
pub struct StatusRow {
    pub query: String,
    pub status: String,
    pub detail: String,
}

// --- Spotify Web API wire types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistObject {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistSearchResponse {
    pub artists: ArtistSearchItems,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistSearchItems {
    pub items: Vec<ArtistObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackObject {
    pub id: String,
    pub name: String,
    pub artists: Vec<ArtistObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSearchResponse {
    pub tracks: TrackSearchItems,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSearchItems {
    pub items: Vec<TrackObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksResponse {
    pub tracks: Vec<TrackObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumObject {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistAlbumsResponse {
    pub items: Vec<AlbumObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleTrack {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumTracksResponse {
    pub items: Vec<SimpleTrack>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistObject {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
}

/// Playlist entry as returned by the current-user playlist listing, which
/// includes playlists the user merely follows. The owner is carried so
/// callers can filter down to playlists the user actually owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPlaylistItem {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPlaylistsResponse {
    pub items: Vec<UserPlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackItem {
    pub track: Option<PlaylistTrackRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackRef {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistTrackItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksResponse {
    pub snapshot_id: String,
}
