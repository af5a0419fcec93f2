use crate::{
    errors::ApiError,
    types::{
        CreatePlaylistRequest, Page, Playlist, PlaylistItem, ReplacePlaylistTracksRequest,
        SnapshotResponse, Track,
    },
    utils,
};

use super::client::WebApi;

/// Largest page size the playlist endpoints accept.
const PAGE_LIMIT: u32 = 50;
const PLAYLIST_ITEMS_LIMIT: u32 = 100;

const PLAYLIST_DESCRIPTION: &str = "Top tracks of the last four weeks, kept up to date by topsync.";

impl WebApi {
    /// Retrieves the first page of playlists owned or followed by the
    /// current user (`GET /me/playlists`).
    ///
    /// Only a single page of up to 50 playlists is fetched; users with more
    /// playlists will not see the rest. `null` entries (deleted or
    /// unavailable playlists) are skipped.
    pub async fn get_my_playlists(&self, token: &str) -> Result<Vec<Playlist>, ApiError> {
        let page: Page<Option<Playlist>> = self
            .json(|| {
                self.get(token, "me/playlists")
                    .query(&[("limit", PAGE_LIMIT)])
            })
            .await?;

        Ok(page.items.into_iter().flatten().collect())
    }

    /// Creates a new playlist for `user_id` (`POST /users/{user_id}/playlists`).
    ///
    /// Visibility is left to Spotify's default.
    pub async fn create_user_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
    ) -> Result<Playlist, ApiError> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: Some(PLAYLIST_DESCRIPTION.to_string()),
            public: None,
        };
        let path = format!("users/{}/playlists", utils::path_segment(user_id));

        self.json(|| self.post(token, &path).json(&body)).await
    }

    /// Replaces every item of a playlist (`PUT /playlists/{id}/tracks`).
    ///
    /// The replacement is atomic on Spotify's side: the playlist either holds
    /// exactly `track_ids` afterwards or is left untouched. An empty slice
    /// clears the playlist.
    pub async fn put_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<String, ApiError> {
        let body = ReplacePlaylistTracksRequest {
            uris: track_ids.iter().map(|id| utils::track_uri(id)).collect(),
        };
        let path = format!("playlists/{}/tracks", utils::path_segment(playlist_id));

        let response: SnapshotResponse = self.json(|| self.put(token, &path).json(&body)).await?;
        Ok(response.snapshot_id)
    }

    pub async fn get_playlist(&self, token: &str, playlist_id: &str) -> Result<Playlist, ApiError> {
        let path = format!("playlists/{}", utils::path_segment(playlist_id));
        self.json(|| self.get(token, &path)).await
    }

    /// First page of a playlist's tracks (`GET /playlists/{id}/tracks`).
    /// Items without a track (removed or unavailable) are skipped.
    pub async fn get_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
    ) -> Result<Vec<Track>, ApiError> {
        let path = format!("playlists/{}/tracks", utils::path_segment(playlist_id));
        let page: Page<PlaylistItem> = self
            .json(|| {
                self.get(token, &path)
                    .query(&[("limit", PLAYLIST_ITEMS_LIMIT)])
            })
            .await?;

        Ok(page.items.into_iter().filter_map(|item| item.track).collect())
    }
}
