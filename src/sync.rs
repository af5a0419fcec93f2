//! The playlist sync workflow.
//!
//! Keeps a playlist called `"<display name>'s Top Tracks"` equal to the
//! user's current top 30 tracks of the last four weeks. The playlist is
//! looked up by exact name among the user's playlists and created when
//! missing. Its items are overwritten with a single request, so tracks that
//! dropped out of the top 30 disappear from it.

use crate::{
    errors::{CacheError, SyncError},
    management::{ACCESS_TOKEN_KEY, TokenCache},
    spotify::SpotifyApi,
    types::{Playlist, TimeRange, TopItemsQuery, Track},
};

pub const TOP_TRACKS_LIMIT: u32 = 30;

pub const TOP_TRACKS_QUERY: TopItemsQuery = TopItemsQuery {
    limit: TOP_TRACKS_LIMIT,
    time_range: TimeRange::ShortTerm,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No usable access token is cached; nothing was sent to Spotify.
    Unauthenticated,
    Updated(SyncReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Playlist metadata as fetched after the replacement.
    pub playlist: Playlist,
    /// Playlist items as fetched after the replacement. Spotify may still
    /// serve the previous items for a short while.
    pub tracks: Vec<Track>,
    /// Whether the playlist had to be created during this run.
    pub created: bool,
    /// Number of top tracks written to the playlist.
    pub synced: usize,
}

/// Canonical name of the sync target playlist.
pub fn playlist_name(display_name: &str) -> String {
    format!("{display_name}'s Top Tracks")
}

/// Runs the sync for the token cached under [`ACCESS_TOKEN_KEY`].
///
/// # Errors
///
/// Any Web API failure aborts the run and is returned as is. Earlier steps
/// are not rolled back, e.g. a freshly created playlist stays empty when
/// the replacement fails.
pub async fn update_playlist(
    api: &dyn SpotifyApi,
    cache: &dyn TokenCache,
) -> Result<SyncOutcome, SyncError> {
    if !cache.has(ACCESS_TOKEN_KEY).await {
        return Ok(SyncOutcome::Unauthenticated);
    }

    let token = match cache.get(ACCESS_TOKEN_KEY).await {
        Ok(token) => token,
        // expired between `has` and `get`
        Err(CacheError::Miss(_)) => return Ok(SyncOutcome::Unauthenticated),
        Err(e) => return Err(e.into()),
    };

    let top_tracks = api.my_top_tracks(&token, TOP_TRACKS_QUERY).await?;

    let (playlist_id, created) = find_or_create_playlist(api, &token).await?;

    let track_ids: Vec<String> = top_tracks.into_iter().map(|track| track.id).collect();
    api.replace_playlist_tracks(&token, &playlist_id, &track_ids)
        .await?;

    let playlist = api.playlist(&token, &playlist_id).await?;
    let tracks = api.playlist_tracks(&token, &playlist_id).await?;

    Ok(SyncOutcome::Updated(SyncReport {
        playlist,
        tracks,
        created,
        synced: track_ids.len(),
    }))
}

/// Resolves the id of the sync target playlist, creating it when none of
/// the user's playlists carries the canonical name. The first exact match
/// wins. Returns the id and whether the playlist was created.
pub async fn find_or_create_playlist(
    api: &dyn SpotifyApi,
    token: &str,
) -> Result<(String, bool), SyncError> {
    let playlists = api.my_playlists(token).await?;
    let user = api.me(token).await?;
    let name = playlist_name(user.name());

    if let Some(existing) = playlists.into_iter().find(|p| p.name == name) {
        return Ok((existing.id, false));
    }

    let playlist = api.create_playlist(token, &user.id, &name).await?;
    Ok((playlist.id, true))
}
