use crate::{
    catalog::Catalog,
    types::BatchOutcome,
    warning,
};

/// Provider hard limit on tracks per add-tracks request.
pub const BATCH_LIMIT: usize = 100;

/// Applies a track list to a playlist in provider-limited batches.
///
/// Splits `track_ids` into chunks of at most [`BATCH_LIMIT`] and issues one
/// add-tracks call per chunk, in order. A failing chunk is reported and
/// counted but does not stop the remaining chunks; partial progress is never
/// rolled back. For `N` tracks exactly `ceil(N / 100)` provider calls are
/// issued, and on full success the applied count equals `N`.
pub async fn apply<C: Catalog>(
    catalog: &C,
    playlist_id: &str,
    track_ids: &[String],
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for chunk in track_ids.chunks(BATCH_LIMIT) {
        match catalog.add_tracks(playlist_id, chunk).await {
            Ok(()) => outcome.applied += chunk.len(),
            Err(e) => {
                warning!("Failed to add a batch of {} tracks: {}", chunk.len(), e);
                outcome.failed_chunks += 1;
            }
        }
    }

    outcome
}
