use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::warning;

/// Errors raised while reading configuration from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid URL in configuration: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to prepare config directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load env file: {0}")]
    Dotenv(#[from] dotenv::Error),
}

/// Errors raised by [`crate::management::TokenCache`] backends.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The key is absent or its entry has expired.
    #[error("No cache entry for key '{0}'")]
    Miss(String),

    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache entry is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors raised while exchanging an authorization code for a token.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The accounts service refused the code (invalid, expired, already used).
    #[error("{message}")]
    Rejected { message: String },

    #[error("No PKCE code verifier has been issued for this session")]
    MissingPkceVerifier,

    #[error("Token request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Errors raised by [`crate::spotify::SpotifyApi`] calls.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Spotify API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Spotify API responded with {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Spotify API rate limit hit, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("Unexpected Spotify API response: {0}")]
    Decode(String),
}

/// Errors raised by the playlist sync workflow.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Failures that escape a route handler and end as a generic error page.
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Playlist sync failed: {0}")]
    Sync(#[from] SyncError),

    #[error("Failed to store access token: {0}")]
    Cache(#[from] CacheError),

    #[error("Failed to render view: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        warning!("{}", self);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong".to_string(),
        )
            .into_response()
    }
}
