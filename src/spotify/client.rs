use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config,
    errors::ApiError,
    types::{ApiErrorResponse, Playlist, TopItemsQuery, Track, User},
    warning,
};

/// The subset of the Spotify Web API the sync workflow relies on.
///
/// Every call carries the bearer token explicitly; implementations keep no
/// per-user state.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// Current user's top tracks, most played first.
    async fn my_top_tracks(&self, token: &str, query: TopItemsQuery)
    -> Result<Vec<Track>, ApiError>;

    async fn me(&self, token: &str) -> Result<User, ApiError>;

    /// First page of the current user's playlists.
    async fn my_playlists(&self, token: &str) -> Result<Vec<Playlist>, ApiError>;

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
    ) -> Result<Playlist, ApiError>;

    /// Overwrites the playlist's items with `track_ids`, in order. Returns
    /// the new snapshot id.
    async fn replace_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<String, ApiError>;

    async fn playlist(&self, token: &str, playlist_id: &str) -> Result<Playlist, ApiError>;

    async fn playlist_tracks(&self, token: &str, playlist_id: &str)
    -> Result<Vec<Track>, ApiError>;
}

/// Bounded retry with jittered exponential backoff.
///
/// Transport failures and 502/503/504 responses are retried after
/// [`RetryPolicy::backoff`]. A 429 response is retried after its
/// `Retry-After` delay, unless that delay exceeds `max_retry_after`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_retry_after: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before the attempt following `attempt` (1-based): the base delay
    /// doubled per attempt plus up to 50% random jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self.base_delay.saturating_mul(1 << exponent);
        let max_jitter = (delay.as_millis() / 2) as u64;
        let jitter = rand::rng().random_range(0..=max_jitter);
        delay + Duration::from_millis(jitter)
    }

    /// What to do about a 429 answer to `attempt` that asked to wait
    /// `retry_after` seconds.
    pub fn on_rate_limit(&self, attempt: u32, retry_after: u64) -> RateLimitDecision {
        let delay = Duration::from_secs(retry_after);
        if delay > self.max_retry_after {
            RateLimitDecision::TooLong
        } else if self.can_retry(attempt) {
            RateLimitDecision::Wait(delay)
        } else {
            RateLimitDecision::Exhausted
        }
    }

    fn can_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Sleep for the requested delay, then try again.
    Wait(Duration),
    /// The requested delay exceeds `max_retry_after`.
    TooLong,
    /// No attempts left.
    Exhausted,
}

/// reqwest-backed [`SpotifyApi`] implementation.
#[derive(Debug, Clone)]
pub struct WebApi {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl WebApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Client for the API base URL from the environment.
    pub fn from_env() -> Self {
        Self::new(config::spotify_apiurl())
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub(super) fn get(&self, token: &str, path: &str) -> RequestBuilder {
        self.http.get(self.url(path)).bearer_auth(token)
    }

    pub(super) fn post(&self, token: &str, path: &str) -> RequestBuilder {
        self.http.post(self.url(path)).bearer_auth(token)
    }

    pub(super) fn put(&self, token: &str, path: &str) -> RequestBuilder {
        self.http.put(self.url(path)).bearer_auth(token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends the request built by `build`, retrying per the [`RetryPolicy`].
    ///
    /// `build` is invoked once per attempt since a sent request cannot be
    /// reused.
    pub(super) async fn send<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 1;

        loop {
            let response = match build().send().await {
                Ok(response) => response,
                Err(e) if (e.is_connect() || e.is_timeout()) && self.retry.can_retry(attempt) => {
                    sleep(self.retry.backoff(attempt)).await;
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = retry_after_secs(&response);
                match self.retry.on_rate_limit(attempt, retry_after) {
                    RateLimitDecision::Wait(delay) => {
                        sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    RateLimitDecision::TooLong => warning!(
                        "Retry after has reached an abnormal high of {} seconds.",
                        retry_after
                    ),
                    RateLimitDecision::Exhausted => warning!(
                        "Still rate limited after {} attempts, giving up.",
                        attempt
                    ),
                }
                return Err(ApiError::RateLimited { retry_after });
            }

            if is_transient(status) && self.retry.can_retry(attempt) {
                sleep(self.retry.backoff(attempt)).await;
                attempt += 1;
                continue;
            }

            return Err(status_error(response).await);
        }
    }

    /// Like [`WebApi::send`], decoding the JSON body into `T`.
    pub(super) async fn json<T, F>(&self, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let response = self.send(build).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SpotifyApi for WebApi {
    async fn my_top_tracks(
        &self,
        token: &str,
        query: TopItemsQuery,
    ) -> Result<Vec<Track>, ApiError> {
        self.get_top_tracks(token, query).await
    }

    async fn me(&self, token: &str) -> Result<User, ApiError> {
        self.get_current_user(token).await
    }

    async fn my_playlists(&self, token: &str) -> Result<Vec<Playlist>, ApiError> {
        self.get_my_playlists(token).await
    }

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
    ) -> Result<Playlist, ApiError> {
        self.create_user_playlist(token, user_id, name).await
    }

    async fn replace_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<String, ApiError> {
        self.put_playlist_tracks(token, playlist_id, track_ids)
            .await
    }

    async fn playlist(&self, token: &str, playlist_id: &str) -> Result<Playlist, ApiError> {
        self.get_playlist(token, playlist_id).await
    }

    async fn playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
    ) -> Result<Vec<Track>, ApiError> {
        self.get_playlist_tracks(token, playlist_id).await
    }
}

fn is_transient(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}

async fn status_error(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    ApiError::Status { status, message }
}
