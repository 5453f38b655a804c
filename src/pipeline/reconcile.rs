use std::collections::HashSet;

use chrono::Local;

use crate::{
    catalog::{Catalog, CatalogError},
    types::{PlaylistTarget, ReconciliationPlan},
};

/// Computes the delta between a desired track list and an existing set.
///
/// Returns the IDs to add and the number of desired IDs excluded because
/// they are already present. The returned list preserves the first-seen
/// order of `desired`, contains no duplicates, and is disjoint from
/// `existing`. A desired ID that appears more than once is considered once.
pub fn plan(existing: &HashSet<String>, desired: &[String]) -> (Vec<String>, usize) {
    let mut seen = HashSet::new();
    let mut to_add = Vec::new();
    let mut already_present = 0;

    for id in desired {
        if !seen.insert(id.clone()) {
            continue;
        }
        if existing.contains(id) {
            already_present += 1;
        } else {
            to_add.push(id.clone());
        }
    }

    (to_add, already_present)
}

/// Plan for a playlist that is always freshly created (the artist flow).
/// No lookup happens; everything desired is to be added.
pub fn fresh_plan(name: &str, desired: &[String]) -> ReconciliationPlan {
    let (to_add, _) = plan(&HashSet::new(), desired);
    ReconciliationPlan {
        target: PlaylistTarget {
            id: None,
            name: name.to_string(),
            existing: HashSet::new(),
        },
        to_add,
        already_present: 0,
    }
}

/// The current local date in ISO form, used to key the setlist playlist.
pub fn today_key() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Name of the setlist playlist for a given date key.
pub fn setlist_name(today_key: &str) -> String {
    format!("Setlist {}", today_key)
}

/// Reconciles the desired setlist tracks against today's setlist playlist.
///
/// Looks up a playlist owned by the current user named exactly
/// `"Setlist " + today_key`. When it exists, its track-ID set is fetched
/// once and the plan excludes every desired ID already present — this is
/// what makes a same-day re-run with the same CSV add nothing. When it does
/// not exist, create semantics apply: the target has no ID yet and every
/// desired track is to be added.
pub async fn reconcile_setlist<C: Catalog>(
    catalog: &C,
    today_key: &str,
    desired: &[String],
) -> Result<ReconciliationPlan, CatalogError> {
    let name = setlist_name(today_key);

    match catalog.find_playlist_by_name(&name).await? {
        Some(playlist) => {
            let existing = catalog.playlist_track_ids(&playlist.id).await?;
            let (to_add, already_present) = plan(&existing, desired);
            Ok(ReconciliationPlan {
                target: PlaylistTarget {
                    id: Some(playlist.id),
                    name,
                    existing,
                },
                to_add,
                already_present,
            })
        }
        None => Ok(fresh_plan(&name, desired)),
    }
}
