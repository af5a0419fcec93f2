use axum::{
    Extension,
    response::{IntoResponse, Response},
};

use crate::{
    errors::RouteError,
    info,
    management::FlashKind,
    server::AppState,
    sync::{self, SyncOutcome},
    views::IndexView,
};

use super::{REDIRECT_PATH, found};

/// Runs the playlist sync and renders the refreshed playlist.
///
/// Without a cached token the user is sent through `/redirect` first.
pub async fn update(Extension(state): Extension<AppState>) -> Result<Response, RouteError> {
    let report = match sync::update_playlist(state.api.as_ref(), state.cache.as_ref()).await? {
        SyncOutcome::Unauthenticated => return Ok(found(REDIRECT_PATH)),
        SyncOutcome::Updated(report) => report,
    };

    if report.created {
        info!("Created playlist {}", report.playlist.name);
    }
    info!(
        "Synced {} tracks into {}",
        report.synced, report.playlist.name
    );

    if report.synced == 0 {
        state
            .flashes
            .add(
                FlashKind::Warning,
                "Spotify reported no top tracks for the last four weeks.",
            )
            .await;
    }
    state
        .flashes
        .add(FlashKind::Success, "Playlist successfully updated!")
        .await;

    let flashes = state.flashes.take().await;
    let view = IndexView::confirmation(flashes, &report.playlist, &report.tracks);
    Ok(view.into_html()?.into_response())
}
