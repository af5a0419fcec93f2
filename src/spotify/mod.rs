//! # Spotify Integration Module
//!
//! Interface to the Spotify accounts service and Web API. It covers the
//! OAuth authorization code flow and the handful of Web API endpoints the
//! playlist sync needs.
//!
//! ## Architecture
//!
//! ```text
//! Sync workflow / HTTP routes
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code, optional PKCE)
//!     ├── Top tracks
//!     ├── Current user
//!     └── Playlist operations (list, create, replace, read)
//!          ↓
//! HTTP Layer (reqwest, JSON, bounded retry)
//!          ↓
//! Spotify Web API
//! ```
//!
//! Both halves sit behind traits ([`OAuthSession`], [`SpotifyApi`]) so the
//! routes and the workflow can run against in-memory fakes.
//!
//! ## API Coverage
//!
//! - `GET /me/top/tracks` - Top tracks over a time range
//! - `GET /me` - Current user profile
//! - `GET /me/playlists` - First page of the user's playlists
//! - `POST /users/{user_id}/playlists` - Create a playlist
//! - `PUT /playlists/{playlist_id}/tracks` - Replace all playlist items
//! - `GET /playlists/{playlist_id}` and `GET /playlists/{playlist_id}/tracks`
//! - `POST /api/token` - Authorization code exchange
//!
//! ## Error Types
//!
//! - [`crate::errors::AuthError`] - Code exchange failures
//! - [`crate::errors::ApiError`] - Web API failures after retries are exhausted

pub mod auth;
pub mod client;
pub mod playlist;
pub mod tracks;
pub mod user;

pub use auth::OAuthSession;
pub use auth::SCOPES;
pub use auth::SessionConfig;
pub use auth::SpotifySession;
pub use client::RateLimitDecision;
pub use client::RetryPolicy;
pub use client::SpotifyApi;
pub use client::WebApi;
