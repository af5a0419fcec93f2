//! # API Module
//!
//! HTTP endpoints of the topsync web server.
//!
//! ## Endpoints
//!
//! - [`index`] - `GET /` landing page
//! - [`update`] - `GET /update` runs the playlist sync and shows the result;
//!   redirects to `/redirect` when no access token is cached
//! - [`callback`] - `GET /callback?code=...` OAuth callback; caches the
//!   access token and redirects to `/update`
//! - [`redirect`] - `GET /redirect` sends the user to Spotify's consent page
//! - [`health`] - `GET /health` status and version information
//!
//! Handlers receive the shared [`crate::server::AppState`] through an
//! [`axum::Extension`] layer. All redirects answer `302 Found`.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use topsync::server::{AppState, router};
//!
//! let app = router(state);
//! ```

mod callback;
mod health;
mod index;
mod redirect;
mod update;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

pub use callback::callback;
pub use health::health;
pub use index::index;
pub use redirect::redirect;
pub use update::update;

pub const INDEX_PATH: &str = "/";
pub const UPDATE_PATH: &str = "/update";
pub const CALLBACK_PATH: &str = "/callback";
pub const REDIRECT_PATH: &str = "/redirect";
pub const HEALTH_PATH: &str = "/health";

/// `302 Found` to `location`.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
