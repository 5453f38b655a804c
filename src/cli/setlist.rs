use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    catalog::Catalog,
    config::Credentials,
    error, info, input, pipeline,
    pipeline::RunSummary,
    spotify::SpotifyClient,
    types::ResolvedEntity,
    warning,
};

/// The setlist flow: reads a CSV of artist/song pairs and writes the
/// resolved tracks into today's `Setlist <date>` playlist, creating it on
/// the first run of the day and only appending missing tracks on re-runs.
pub async fn setlist(file: String) {
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(missing) => error!(
            "Missing required environment variables: {}",
            missing.join(", ")
        ),
    };

    let setlist = match input::read_setlist_csv(&file) {
        Ok(setlist) => setlist,
        Err(e) => error!("{}", e),
    };

    info!("Loaded {} tracks from setlist", setlist.records.len());
    if setlist.malformed > 0 {
        warning!(
            "Skipped {} rows missing an artist or song field",
            setlist.malformed
        );
    }

    let client = match SpotifyClient::new(credentials).await {
        Ok(client) => client,
        Err(e) => error!(
            "Failed to load token. Please run spotigen auth\n Error: {}",
            e
        ),
    };

    let mut summary = RunSummary::new();
    summary.record_malformed(setlist.malformed);

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    // Resolve everything first; summary rows need the existing-track set
    // that the reconciler fetches afterwards.
    let total = setlist.records.len();
    let mut entities: Vec<(ResolvedEntity, String)> = Vec::new();
    for (i, record) in setlist.records.iter().enumerate() {
        pb.set_message(format!(
            "[{count}/{total}] Searching for: {query}",
            count = i + 1,
            total = total,
            query = record.label()
        ));

        match pipeline::resolve(&client, record).await {
            Ok(entity) => {
                let detail = entity.matched.clone().unwrap_or_default();
                entities.push((entity, detail));
            }
            Err(e) => entities.push((pipeline::unresolved(record), e.to_string())),
        }
    }
    pb.finish_and_clear();

    let desired: Vec<String> = entities
        .iter()
        .filter_map(|(entity, _)| entity.catalog_id.clone())
        .collect();

    let today = pipeline::today_key();
    let plan = match pipeline::reconcile_setlist(&client, &today, &desired).await {
        Ok(plan) => plan,
        Err(e) => {
            warning!("Failed to check for existing playlist: {}", e);
            pipeline::fresh_plan(&pipeline::setlist_name(&today), &desired)
        }
    };

    for (entity, detail) in &entities {
        match &entity.catalog_id {
            Some(id) if plan.target.existing.contains(id) => summary.record_duplicate(entity),
            _ => summary.record_resolved(entity, detail.clone()),
        }
    }

    let playlist_id = match plan.target.id.clone() {
        Some(id) => {
            info!("Found existing playlist: {}", plan.target.name);
            info!(
                "Playlist currently has {} tracks",
                plan.target.existing.len()
            );
            Some(id)
        }
        None => {
            let description = format!("Setlist playlist created/updated on {}", today);
            match client.create_playlist(&plan.target.name, &description).await {
                Ok(playlist) => {
                    info!("Created new playlist: {}", plan.target.name);
                    Some(playlist.id)
                }
                Err(e) => {
                    warning!("Failed to create playlist '{}': {}", plan.target.name, e);
                    None
                }
            }
        }
    };

    if let Some(playlist_id) = playlist_id {
        if plan.to_add.is_empty() {
            info!("No new tracks to add");
        } else {
            let outcome = pipeline::apply(&client, &playlist_id, &plan.to_add).await;
            summary.record_batch(outcome);
        }

        summary.print("Setlist Playlist Summary");
        info!("https://open.spotify.com/playlist/{}", playlist_id);
    } else {
        summary.print("Setlist Playlist Summary");
    }
}
