use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    error,
    management::FileCache,
    spotify::WebApi,
    success,
    sync::{self, SyncOutcome},
    types::TrackTableRow,
    warning,
};

/// Runs the playlist sync with the token cached by `topsync serve --cache file`.
pub async fn sync() {
    let cache = FileCache::in_data_dir();
    let api = WebApi::from_env();

    let pb = ProgressBar::new_spinner();
    pb.set_message("Syncing top tracks...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let outcome = sync::update_playlist(&api, &cache).await;
    pb.finish_and_clear();

    let report = match outcome {
        Ok(SyncOutcome::Updated(report)) => report,
        Ok(SyncOutcome::Unauthenticated) => error!(
            "No cached access token. Run topsync serve --cache file and open /update to sign in."
        ),
        Err(e) => error!("Failed to update playlist. Err: {}", e),
    };

    if report.created {
        success!("Created playlist {}", report.playlist.name);
    }
    if report.synced == 0 {
        warning!("Spotify reported no top tracks for the last four weeks.");
    }
    success!(
        "Playlist {} updated with {} tracks.",
        report.playlist.name,
        report.synced
    );

    let rows: Vec<TrackTableRow> = report
        .tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: i + 1,
            name: t.name.clone(),
            artists: t.artist_names(),
        })
        .collect();

    println!("{}", Table::new(rows));
}
