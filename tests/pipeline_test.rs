use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use spotigen::catalog::{Catalog, CatalogError};
use spotigen::pipeline::{self, uploader::BATCH_LIMIT};
use spotigen::types::{
    AlbumObject, ArtistObject, MatchKind, PlaylistObject, QueryRecord, SimpleTrack, TrackObject,
};

// --- In-memory catalog fake ---

/// Fake catalog the pipeline stages run against in place of the Spotify
/// client. Read-only fixtures are plain maps keyed by the query the test
/// issues; playlist state is mutable to exercise reconciliation.
#[derive(Default)]
struct FakeCatalog {
    artist_hits: HashMap<String, ArtistObject>,
    exact_tracks: HashMap<(String, String), Vec<TrackObject>>,
    free_tracks: HashMap<(String, String), Vec<TrackObject>>,
    top_tracks: HashMap<String, Vec<TrackObject>>,
    albums: HashMap<String, Vec<AlbumObject>>,
    album_tracks: HashMap<String, Vec<SimpleTrack>>,
    playlists: Mutex<Vec<PlaylistObject>>,
    playlist_tracks: Mutex<HashMap<String, Vec<String>>>,
    /// Sizes of the add-tracks calls received, in order.
    add_calls: Mutex<Vec<usize>>,
    /// 0-based indices of add-tracks calls that should fail.
    fail_chunks: HashSet<usize>,
}

impl Catalog for FakeCatalog {
    async fn current_user_id(&self) -> Result<String, CatalogError> {
        Ok("tester".to_string())
    }

    async fn search_artist(&self, name: &str) -> Result<Option<ArtistObject>, CatalogError> {
        Ok(self.artist_hits.get(name).cloned())
    }

    async fn search_track_exact(
        &self,
        artist: &str,
        song: &str,
    ) -> Result<Vec<TrackObject>, CatalogError> {
        Ok(self
            .exact_tracks
            .get(&(artist.to_string(), song.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn search_track_free(
        &self,
        artist: &str,
        song: &str,
    ) -> Result<Vec<TrackObject>, CatalogError> {
        Ok(self
            .free_tracks
            .get(&(artist.to_string(), song.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn artist_top_tracks(
        &self,
        artist_id: &str,
        _country: &str,
    ) -> Result<Vec<TrackObject>, CatalogError> {
        Ok(self.top_tracks.get(artist_id).cloned().unwrap_or_default())
    }

    async fn artist_albums(&self, artist_id: &str) -> Result<Vec<AlbumObject>, CatalogError> {
        Ok(self.albums.get(artist_id).cloned().unwrap_or_default())
    }

    async fn album_tracks(&self, album_id: &str) -> Result<Vec<SimpleTrack>, CatalogError> {
        Ok(self.album_tracks.get(album_id).cloned().unwrap_or_default())
    }

    async fn find_playlist_by_name(
        &self,
        name: &str,
    ) -> Result<Option<PlaylistObject>, CatalogError> {
        Ok(self
            .playlists
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn create_playlist(
        &self,
        name: &str,
        _description: &str,
    ) -> Result<PlaylistObject, CatalogError> {
        let mut playlists = self.playlists.lock().unwrap();
        let playlist = PlaylistObject {
            id: format!("pl{}", playlists.len() + 1),
            name: name.to_string(),
        };
        playlists.push(playlist.clone());
        Ok(playlist)
    }

    async fn playlist_track_ids(
        &self,
        playlist_id: &str,
    ) -> Result<HashSet<String>, CatalogError> {
        Ok(self
            .playlist_tracks
            .lock()
            .unwrap()
            .get(playlist_id)
            .map(|tracks| tracks.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), CatalogError> {
        let call_index = {
            let mut calls = self.add_calls.lock().unwrap();
            calls.push(track_ids.len());
            calls.len() - 1
        };

        if self.fail_chunks.contains(&call_index) {
            return Err(CatalogError::Provider("simulated batch failure".to_string()));
        }

        self.playlist_tracks
            .lock()
            .unwrap()
            .entry(playlist_id.to_string())
            .or_default()
            .extend(track_ids.iter().cloned());
        Ok(())
    }
}

// --- Fixture helpers ---

fn artist(id: &str, name: &str) -> ArtistObject {
    ArtistObject {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn track(id: &str, name: &str, artist_name: &str) -> TrackObject {
    TrackObject {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![artist(&format!("{}_artist", id), artist_name)],
    }
}

fn simple_track(id: &str, name: &str) -> SimpleTrack {
    SimpleTrack {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn album(id: &str, name: &str) -> AlbumObject {
    AlbumObject {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn artist_query(name: &str) -> QueryRecord {
    QueryRecord::ArtistOnly {
        artist: name.to_string(),
    }
}

fn song_query(artist: &str, song: &str) -> QueryRecord {
    QueryRecord::ArtistSong {
        artist: artist.to_string(),
        song: song.to_string(),
    }
}

// --- Resolver ---

#[tokio::test]
async fn test_resolve_artist_exact_match_case_insensitive() {
    let mut catalog = FakeCatalog::default();
    catalog
        .artist_hits
        .insert("miles davis".to_string(), artist("a1", "Miles Davis"));

    let entity = pipeline::resolve(&catalog, &artist_query("miles davis"))
        .await
        .unwrap();

    assert_eq!(entity.catalog_id.as_deref(), Some("a1"));
    assert_eq!(entity.match_kind, MatchKind::Exact);
    assert_eq!(entity.matched.as_deref(), Some("Miles Davis"));
}

#[tokio::test]
async fn test_resolve_artist_fallback_on_name_mismatch() {
    let mut catalog = FakeCatalog::default();
    catalog
        .artist_hits
        .insert("Mile Davis".to_string(), artist("a1", "Miles Davis"));

    let entity = pipeline::resolve(&catalog, &artist_query("Mile Davis"))
        .await
        .unwrap();

    // Top hit is taken anyway, but marked as a fallback match
    assert_eq!(entity.catalog_id.as_deref(), Some("a1"));
    assert_eq!(entity.match_kind, MatchKind::Fallback);
}

#[tokio::test]
async fn test_resolve_artist_not_found_is_a_value() {
    let catalog = FakeCatalog::default();

    let entity = pipeline::resolve(&catalog, &artist_query("Nobody"))
        .await
        .unwrap();

    assert!(entity.catalog_id.is_none());
    assert_eq!(entity.match_kind, MatchKind::NotFound);
}

#[tokio::test]
async fn test_resolve_track_exact_search_hit() {
    let mut catalog = FakeCatalog::default();
    catalog.exact_tracks.insert(
        ("John Coltrane".to_string(), "Giant Steps".to_string()),
        vec![track("t1", "Giant Steps", "John Coltrane")],
    );

    let entity = pipeline::resolve(&catalog, &song_query("John Coltrane", "Giant Steps"))
        .await
        .unwrap();

    assert_eq!(entity.catalog_id.as_deref(), Some("t1"));
    assert_eq!(entity.match_kind, MatchKind::Exact);
}

#[tokio::test]
async fn test_resolve_track_prefers_matching_artist_among_hits() {
    let mut catalog = FakeCatalog::default();
    catalog.exact_tracks.insert(
        ("John Coltrane".to_string(), "Naima".to_string()),
        vec![
            track("cover", "Naima", "Some Cover Band"),
            track("orig", "Naima", "john coltrane"),
        ],
    );

    let entity = pipeline::resolve(&catalog, &song_query("John Coltrane", "Naima"))
        .await
        .unwrap();

    assert_eq!(entity.catalog_id.as_deref(), Some("orig"));
    assert_eq!(entity.match_kind, MatchKind::Exact);
}

#[tokio::test]
async fn test_resolve_track_falls_back_to_free_text_search() {
    let mut catalog = FakeCatalog::default();
    catalog.free_tracks.insert(
        ("Miles Davis".to_string(), "So What".to_string()),
        vec![track("t2", "So What", "Miles Davis")],
    );

    let entity = pipeline::resolve(&catalog, &song_query("Miles Davis", "So What"))
        .await
        .unwrap();

    assert_eq!(entity.catalog_id.as_deref(), Some("t2"));
    assert_eq!(entity.match_kind, MatchKind::Fallback);
}

#[tokio::test]
async fn test_resolve_track_not_found_on_both_searches() {
    let catalog = FakeCatalog::default();

    let entity = pipeline::resolve(&catalog, &song_query("Nobody", "Nothing"))
        .await
        .unwrap();

    assert!(entity.catalog_id.is_none());
    assert_eq!(entity.match_kind, MatchKind::NotFound);
}

// --- Selector ---

fn selector_catalog() -> FakeCatalog {
    let mut catalog = FakeCatalog::default();
    catalog.top_tracks.insert(
        "a1".to_string(),
        vec![
            track("t1", "Hit One", "Artist"),
            track("t2", "Hit Two", "Artist"),
            track("t3", "Hit Three", "Artist"),
            track("t4", "Hit Four", "Artist"),
        ],
    );
    catalog.albums.insert(
        "a1".to_string(),
        vec![album("al1", "First Album"), album("al2", "Second Album")],
    );
    catalog.album_tracks.insert(
        "al1".to_string(),
        vec![
            simple_track("t2", "Hit Two"),
            simple_track("d1", "Cut One"),
            simple_track("d2", "Cut Two"),
        ],
    );
    catalog.album_tracks.insert(
        "al2".to_string(),
        vec![simple_track("d3", "Cut Three"), simple_track("d4", "Cut Four")],
    );
    catalog
}

#[tokio::test]
async fn test_select_tiers_are_disjoint() {
    let catalog = selector_catalog();

    let selection = pipeline::select(&catalog, "a1", 3, 3, "US").await.unwrap();

    assert_eq!(selection.popular, ids(&["t1", "t2", "t3"]));
    // t2 is excluded from deep cuts because it is already popular
    assert_eq!(selection.deep_cuts, ids(&["d1", "d2", "d3"]));

    let popular: HashSet<_> = selection.popular.iter().collect();
    let deep: HashSet<_> = selection.deep_cuts.iter().collect();
    assert!(popular.is_disjoint(&deep));
}

#[tokio::test]
async fn test_select_zero_limits_yield_empty_tiers() {
    let catalog = selector_catalog();

    let selection = pipeline::select(&catalog, "a1", 0, 0, "US").await.unwrap();

    assert!(selection.popular.is_empty());
    assert!(selection.deep_cuts.is_empty());
}

#[tokio::test]
async fn test_select_returns_fewer_deep_cuts_when_scarce() {
    let catalog = selector_catalog();

    let selection = pipeline::select(&catalog, "a1", 3, 10, "US").await.unwrap();

    // Only four non-popular tracks exist across the albums
    assert_eq!(selection.deep_cuts, ids(&["d1", "d2", "d3", "d4"]));
}

#[tokio::test]
async fn test_select_collapses_duplicate_album_titles() {
    let mut catalog = FakeCatalog::default();
    catalog.albums.insert(
        "a1".to_string(),
        vec![album("al1", "Blue"), album("al2", "blue")],
    );
    catalog
        .album_tracks
        .insert("al1".to_string(), vec![simple_track("d1", "Cut One")]);
    catalog
        .album_tracks
        .insert("al2".to_string(), vec![simple_track("dx", "Deluxe Cut")]);

    let selection = pipeline::select(&catalog, "a1", 0, 5, "US").await.unwrap();

    // The deluxe re-release with the same title is not scanned
    assert_eq!(selection.deep_cuts, ids(&["d1"]));
}

#[tokio::test]
async fn test_select_scans_at_most_five_albums() {
    let mut catalog = FakeCatalog::default();
    let albums: Vec<AlbumObject> = (1..=6)
        .map(|i| album(&format!("al{}", i), &format!("Album {}", i)))
        .collect();
    catalog.albums.insert("a1".to_string(), albums);
    // Only the sixth album has any tracks
    catalog
        .album_tracks
        .insert("al6".to_string(), vec![simple_track("d1", "Cut One")]);

    let selection = pipeline::select(&catalog, "a1", 0, 3, "US").await.unwrap();

    assert!(selection.deep_cuts.is_empty());
}

// --- Reconciler ---

#[test]
fn test_plan_preserves_order_and_excludes_existing() {
    let existing: HashSet<String> = ids(&["b"]).into_iter().collect();
    let desired = ids(&["a", "b", "c", "a", "d"]);

    let (to_add, already_present) = pipeline::plan(&existing, &desired);

    assert_eq!(to_add, ids(&["a", "c", "d"]));
    assert_eq!(already_present, 1);
}

#[test]
fn test_fresh_plan_adds_everything_once() {
    let plan = pipeline::fresh_plan("Most Popular Tracks", &ids(&["a", "b", "a"]));

    assert!(plan.target.id.is_none());
    assert_eq!(plan.to_add, ids(&["a", "b"]));
    assert_eq!(plan.already_present, 0);
}

#[test]
fn test_setlist_name() {
    assert_eq!(pipeline::setlist_name("2025-03-01"), "Setlist 2025-03-01");
}

#[tokio::test]
async fn test_reconcile_creates_when_playlist_missing() {
    let catalog = FakeCatalog::default();
    let desired = ids(&["t1", "t2", "t3"]);

    let plan = pipeline::reconcile_setlist(&catalog, "2025-03-01", &desired)
        .await
        .unwrap();

    assert!(plan.target.id.is_none());
    assert_eq!(plan.target.name, "Setlist 2025-03-01");
    assert_eq!(plan.to_add, desired);
    assert_eq!(plan.already_present, 0);
}

#[tokio::test]
async fn test_reconcile_skips_tracks_already_present() {
    let catalog = FakeCatalog::default();
    catalog.playlists.lock().unwrap().push(PlaylistObject {
        id: "pl1".to_string(),
        name: "Setlist 2025-03-01".to_string(),
    });
    catalog
        .playlist_tracks
        .lock()
        .unwrap()
        .insert("pl1".to_string(), ids(&["t1", "t2", "t3"]));

    let plan = pipeline::reconcile_setlist(&catalog, "2025-03-01", &ids(&["t1", "t2", "t3"]))
        .await
        .unwrap();

    assert_eq!(plan.target.id.as_deref(), Some("pl1"));
    assert!(plan.to_add.is_empty());
    assert_eq!(plan.already_present, 3);
}

#[tokio::test]
async fn test_setlist_rerun_same_day_adds_nothing() {
    let catalog = FakeCatalog::default();
    let desired = ids(&["t1", "t2", "t3"]);
    let today = "2025-03-01";

    // First run of the day: nothing exists yet
    let plan = pipeline::reconcile_setlist(&catalog, today, &desired)
        .await
        .unwrap();
    assert!(plan.target.id.is_none());

    let playlist = catalog
        .create_playlist(&plan.target.name, "Setlist playlist")
        .await
        .unwrap();
    let outcome = pipeline::apply(&catalog, &playlist.id, &plan.to_add).await;
    assert_eq!(outcome.applied, 3);
    assert_eq!(outcome.failed_chunks, 0);

    // Second run with the same CSV: every track is already present
    let plan = pipeline::reconcile_setlist(&catalog, today, &desired)
        .await
        .unwrap();
    assert_eq!(plan.target.id.as_deref(), Some(playlist.id.as_str()));
    assert!(plan.to_add.is_empty());
    assert_eq!(plan.already_present, outcome.applied);
}

// --- Uploader ---

#[tokio::test]
async fn test_apply_chunks_at_provider_limit() {
    let catalog = FakeCatalog::default();
    let tracks: Vec<String> = (0..250).map(|i| format!("t{}", i)).collect();

    let outcome = pipeline::apply(&catalog, "pl1", &tracks).await;

    assert_eq!(outcome.applied, 250);
    assert_eq!(outcome.failed_chunks, 0);
    // ceil(250 / 100) = 3 provider calls: 100, 100, 50
    assert_eq!(*catalog.add_calls.lock().unwrap(), vec![100, 100, 50]);
    assert_eq!(
        catalog.playlist_tracks.lock().unwrap().get("pl1").unwrap().len(),
        250
    );
}

#[tokio::test]
async fn test_apply_continues_past_failing_chunk() {
    let mut catalog = FakeCatalog::default();
    catalog.fail_chunks.insert(1); // second chunk fails
    let tracks: Vec<String> = (0..250).map(|i| format!("t{}", i)).collect();

    let outcome = pipeline::apply(&catalog, "pl1", &tracks).await;

    // All three chunks are attempted; the failed one is counted, not fatal
    assert_eq!(catalog.add_calls.lock().unwrap().len(), 3);
    assert_eq!(outcome.applied, 150);
    assert_eq!(outcome.failed_chunks, 1);
}

#[tokio::test]
async fn test_apply_empty_list_issues_no_calls() {
    let catalog = FakeCatalog::default();

    let outcome = pipeline::apply(&catalog, "pl1", &[]).await;

    assert_eq!(outcome, spotigen::types::BatchOutcome::default());
    assert!(catalog.add_calls.lock().unwrap().is_empty());
}

// Sanity check on the constant the chunk math relies on.
#[test]
fn test_batch_limit_is_provider_limit() {
    assert_eq!(BATCH_LIMIT, 100);
}
