//! Configuration management for topsync.
//!
//! Configuration is read from environment variables. Before the first
//! lookup, [`load_env`] pulls in optional `.env` files so credentials do not
//! have to be exported by hand:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::errors::ConfigError;

pub const APP_DIR: &str = "topsync";

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Loads environment variables from `.env` files.
///
/// Creates the application's local data directory if needed, then loads
/// `<data_local_dir>/topsync/.env` followed by `./.env`. Both files are
/// optional; variables already present in the environment are never
/// overridden.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or if an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)?;
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Platform-specific data directory of the application
/// (e.g. `~/.local/share/topsync` on Linux).
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Directory used by the file-backed token cache.
pub fn cache_dir() -> PathBuf {
    data_dir().join("cache")
}

/// Address the HTTP server binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Client ID of the registered Spotify application (`SPOTIFY_API_AUTH_CLIENT_ID`).
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Client secret of the registered Spotify application
/// (`SPOTIFY_API_AUTH_CLIENT_SECRET`).
///
/// Optional: without a secret the session falls back to the PKCE flow.
/// The secret should never be exposed in logs or version control.
pub fn spotify_client_secret() -> Option<String> {
    env::var("SPOTIFY_API_AUTH_CLIENT_SECRET")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Callback URL registered with Spotify (`SPOTIFY_API_REDIRECT_URI`),
/// e.g. `http://127.0.0.1:8000/callback`.
pub fn spotify_redirect_uri() -> Result<String, ConfigError> {
    required("SPOTIFY_API_REDIRECT_URI")
}

pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string())
}

pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string())
}

pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}
