use std::collections::HashSet;

use tokio::time::sleep;

use crate::{
    catalog::{Catalog, CatalogError},
    pipeline::resolver::TRACK_PACING,
    types::TrackSelection,
};

/// Upper bound on albums scanned per artist when collecting deep cuts.
/// Keeps the per-artist request count predictable for rate limiting.
pub const ALBUM_SCAN_CAP: usize = 5;

/// Builds the popular and deep-cut track tiers for one resolved artist.
///
/// Popular tracks come from the provider's top-tracks endpoint scoped to
/// `country`, truncated to `popular_limit` in the provider's popularity
/// order. Deep cuts are collected from the track listings of up to
/// [`ALBUM_SCAN_CAP`] of the artist's albums (provider order, duplicate
/// album titles collapsed case-insensitively), excluding any track already
/// in the popular tier, truncated to `deep_limit`.
///
/// Fewer than `deep_limit` qualifying tracks is not an error; a limit of 0
/// yields an empty tier. The two tiers are disjoint and each is free of
/// duplicates.
pub async fn select<C: Catalog>(
    catalog: &C,
    artist_id: &str,
    popular_limit: usize,
    deep_limit: usize,
    country: &str,
) -> Result<TrackSelection, CatalogError> {
    let mut selection = TrackSelection {
        artist_id: artist_id.to_string(),
        ..Default::default()
    };

    if popular_limit > 0 {
        sleep(TRACK_PACING).await;
        let top = catalog.artist_top_tracks(artist_id, country).await?;

        let mut seen = HashSet::new();
        for track in top {
            if seen.insert(track.id.clone()) {
                selection.popular.push(track.id);
                if selection.popular.len() == popular_limit {
                    break;
                }
            }
        }
    }

    if deep_limit > 0 {
        sleep(TRACK_PACING).await;
        let albums = catalog.artist_albums(artist_id).await?;

        // Collapse deluxe editions and re-releases that share a title.
        let mut seen_titles = HashSet::new();
        let albums: Vec<_> = albums
            .into_iter()
            .filter(|album| seen_titles.insert(album.name.to_lowercase()))
            .take(ALBUM_SCAN_CAP)
            .collect();

        let mut picked: HashSet<String> = selection.popular.iter().cloned().collect();

        'albums: for album in albums {
            sleep(TRACK_PACING).await;
            let tracks = catalog.album_tracks(&album.id).await?;

            for track in tracks {
                if picked.insert(track.id.clone()) {
                    selection.deep_cuts.push(track.id);
                    if selection.deep_cuts.len() == deep_limit {
                        break 'albums;
                    }
                }
            }
        }
    }

    Ok(selection)
}
