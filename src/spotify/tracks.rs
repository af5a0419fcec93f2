use crate::{
    errors::ApiError,
    types::{Page, TopItemsQuery, Track},
};

use super::client::WebApi;

impl WebApi {
    /// Retrieves the current user's top tracks from the Spotify Web API.
    ///
    /// Uses `GET /me/top/tracks` (requires the `user-top-read` scope). The
    /// order of the returned tracks is the ranking reported by Spotify.
    ///
    /// # Arguments
    ///
    /// * `token` - Valid access token for Spotify API authentication
    /// * `query` - Number of tracks (1-50) and the aggregation window
    ///
    /// # Example
    ///
    /// ```
    /// let query = TopItemsQuery { limit: 30, time_range: TimeRange::ShortTerm };
    /// let tracks = api.get_top_tracks(token, query).await?;
    /// ```
    pub async fn get_top_tracks(
        &self,
        token: &str,
        query: TopItemsQuery,
    ) -> Result<Vec<Track>, ApiError> {
        let params = [
            ("limit", query.limit.to_string()),
            ("time_range", query.time_range.to_string()),
        ];

        let page: Page<Track> = self
            .json(|| self.get(token, "me/top/tracks").query(&params))
            .await?;

        Ok(page.items)
    }
}
