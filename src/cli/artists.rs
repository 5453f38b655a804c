use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    catalog::Catalog,
    config::Credentials,
    error, info, input, pipeline,
    pipeline::RunSummary,
    spotify::SpotifyClient,
    warning,
};

/// Tuning knobs for the artist flow, collected from CLI flags.
#[derive(Debug, Clone)]
pub struct ArtistFlowOptions {
    pub popular_limit: usize,
    pub deep_limit: usize,
    pub country: String,
    pub popular_name: String,
    pub deep_name: String,
}

/// The artist flow: reads an artist-list file and builds two freshly
/// created playlists, one with each artist's most popular tracks and one
/// with deep cuts from their album catalog.
///
/// Per-artist failures (unresolvable name, selection errors) are recorded
/// in the summary and processing continues; only setup errors terminate.
pub async fn artists(file: String, options: ArtistFlowOptions) {
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(missing) => error!(
            "Missing required environment variables: {}",
            missing.join(", ")
        ),
    };

    let records = match input::read_artist_file(&file) {
        Ok(records) => records,
        Err(e) => error!("{}", e),
    };

    info!("Found {} artists in file", records.len());
    let preview: Vec<String> = records.iter().take(5).map(|r| r.label()).collect();
    if records.len() > 5 {
        info!("First 5 artists: {}...", preview.join(", "));
    } else {
        info!("Artists: {}", preview.join(", "));
    }

    let client = match SpotifyClient::new(credentials).await {
        Ok(client) => client,
        Err(e) => error!(
            "Failed to load token. Please run spotigen auth\n Error: {}",
            e
        ),
    };

    let mut summary = RunSummary::new();
    let mut popular_tracks: Vec<String> = Vec::new();
    let mut deep_cut_tracks: Vec<String> = Vec::new();

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let total = records.len();
    for (i, record) in records.iter().enumerate() {
        pb.set_message(format!(
            "[{count}/{total}] Processing artist: {artist}",
            count = i + 1,
            total = total,
            artist = record.label()
        ));

        let entity = match pipeline::resolve(&client, record).await {
            Ok(entity) => entity,
            Err(e) => {
                summary.record_resolved(&pipeline::unresolved(record), e.to_string());
                continue;
            }
        };

        let Some(artist_id) = entity.catalog_id.clone() else {
            summary.record_resolved(&entity, String::new());
            continue;
        };

        match pipeline::select(
            &client,
            &artist_id,
            options.popular_limit,
            options.deep_limit,
            &options.country,
        )
        .await
        {
            Ok(selection) => {
                let detail = format!(
                    "{} popular + {} deep cuts",
                    selection.popular.len(),
                    selection.deep_cuts.len()
                );
                popular_tracks.extend(selection.popular);
                deep_cut_tracks.extend(selection.deep_cuts);
                summary.record_resolved(&entity, detail);
            }
            Err(e) => {
                summary.record_resolved(&entity, format!("track selection failed: {}", e));
            }
        }
    }

    pb.finish_and_clear();

    let targets = [
        (
            options.popular_name,
            "A collection of the most popular tracks from my favorite artists",
            popular_tracks,
        ),
        (
            options.deep_name,
            "Lesser-known gems from my favorite artists",
            deep_cut_tracks,
        ),
    ];

    let mut urls: Vec<String> = Vec::new();
    for (name, description, tracks) in targets {
        let plan = pipeline::fresh_plan(&name, &tracks);

        match client.create_playlist(&name, description).await {
            Ok(playlist) => {
                info!("Created playlist '{}' with ID: {}", name, playlist.id);
                let outcome = pipeline::apply(&client, &playlist.id, &plan.to_add).await;
                summary.record_batch(outcome);
                urls.push(format!("https://open.spotify.com/playlist/{}", playlist.id));
            }
            Err(e) => {
                warning!("Failed to create playlist '{}': {}", name, e);
            }
        }
    }

    summary.print("Playlist Creation Summary");
    for url in urls {
        info!("{}", url);
    }
}
