use std::time::Duration;

use tokio::time::sleep;

use crate::{
    catalog::{Catalog, CatalogError},
    types::{MatchKind, QueryRecord, ResolvedEntity},
};

/// Pacing delay inserted before each artist-level catalog query.
pub const ARTIST_PACING: Duration = Duration::from_secs(1);

/// Pacing delay inserted before each track-level catalog query.
pub const TRACK_PACING: Duration = Duration::from_millis(100);

/// Resolves one query record against the catalog.
///
/// For an artist query, a targeted search is issued and the top hit is taken.
/// The match is `Exact` when the returned artist name equals the query
/// case-insensitively, `Fallback` otherwise, `NotFound` when there is no hit.
///
/// For an artist/song pair, a quoted `artist:"..." track:"..."` search is
/// issued first; any hit counts as `Exact`, preferring a hit whose artist
/// name equals the query. On zero hits a broad free-text search runs and its
/// top hit counts as `Fallback`. Zero hits on both yields `NotFound`.
///
/// A `NotFound` outcome is a value, not an error; only transport failures
/// propagate. Every call is preceded by a fixed pacing sleep
/// ([`ARTIST_PACING`] or [`TRACK_PACING`]) to stay under provider rate
/// limits.
pub async fn resolve<C: Catalog>(
    catalog: &C,
    record: &QueryRecord,
) -> Result<ResolvedEntity, CatalogError> {
    match record {
        QueryRecord::ArtistOnly { artist } => resolve_artist(catalog, record, artist).await,
        QueryRecord::ArtistSong { artist, song } => {
            resolve_track(catalog, record, artist, song).await
        }
    }
}

async fn resolve_artist<C: Catalog>(
    catalog: &C,
    record: &QueryRecord,
    artist: &str,
) -> Result<ResolvedEntity, CatalogError> {
    sleep(ARTIST_PACING).await;

    let hit = catalog.search_artist(artist).await?;

    Ok(match hit {
        Some(found) => {
            let match_kind = if found.name.to_lowercase() == artist.to_lowercase() {
                MatchKind::Exact
            } else {
                MatchKind::Fallback
            };
            ResolvedEntity {
                query: record.clone(),
                catalog_id: Some(found.id),
                match_kind,
                matched: Some(found.name),
            }
        }
        None => unresolved(record),
    })
}

async fn resolve_track<C: Catalog>(
    catalog: &C,
    record: &QueryRecord,
    artist: &str,
    song: &str,
) -> Result<ResolvedEntity, CatalogError> {
    sleep(TRACK_PACING).await;

    let hits = catalog.search_track_exact(artist, song).await?;
    if !hits.is_empty() {
        // Prefer a hit whose artist name matches the query exactly.
        let best = hits
            .iter()
            .find(|track| {
                track
                    .artists
                    .iter()
                    .any(|a| a.name.to_lowercase() == artist.to_lowercase())
            })
            .unwrap_or(&hits[0]);

        return Ok(ResolvedEntity {
            query: record.clone(),
            catalog_id: Some(best.id.clone()),
            match_kind: MatchKind::Exact,
            matched: Some(track_label(best)),
        });
    }

    sleep(TRACK_PACING).await;

    let hits = catalog.search_track_free(artist, song).await?;
    Ok(match hits.first() {
        Some(top) => ResolvedEntity {
            query: record.clone(),
            catalog_id: Some(top.id.clone()),
            match_kind: MatchKind::Fallback,
            matched: Some(track_label(top)),
        },
        None => unresolved(record),
    })
}

/// An unresolved entity for a query, used both for zero-hit searches and
/// for per-record transport failures that the run absorbs.
pub fn unresolved(record: &QueryRecord) -> ResolvedEntity {
    ResolvedEntity {
        query: record.clone(),
        catalog_id: None,
        match_kind: MatchKind::NotFound,
        matched: None,
    }
}

fn track_label(track: &crate::types::TrackObject) -> String {
    match track.artists.first() {
        Some(artist) => format!("{} - {}", artist.name, track.name),
        None => track.name.clone(),
    }
}
