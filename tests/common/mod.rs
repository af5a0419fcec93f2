#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Request, Response},
};
use tower::ServiceExt;

use topsync::{
    errors::{ApiError, AuthError, CacheError},
    management::{MemoryCache, TokenCache},
    server::{AppState, router},
    spotify::{OAuthSession, SpotifyApi},
    types::{
        AuthorizeOptions, ExternalUrls, Playlist, PlaylistTracksRef, Token, TopItemsQuery, Track,
        TrackArtist, User,
    },
};

// Helper function to create a test track
pub fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        name: format!("Song {id}"),
        uri: format!("spotify:track:{id}"),
        artists: vec![TrackArtist {
            name: format!("Artist {id}"),
        }],
        album: None,
    }
}

// Helper function to create a test playlist
pub fn playlist(id: &str, name: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        public: Some(false),
        collaborative: false,
        snapshot_id: "snap0".to_string(),
        external_urls: ExternalUrls {
            spotify: Some(format!("https://open.spotify.com/playlist/{id}")),
        },
        tracks: PlaylistTracksRef::default(),
    }
}

pub fn user(id: &str, display_name: &str) -> User {
    User {
        id: id.to_string(),
        display_name: Some(display_name.to_string()),
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    /// Remote playlists and their track ids, in listing order.
    pub playlists: Vec<(Playlist, Vec<String>)>,
    /// Method name and token of every call, in order.
    pub calls: Vec<(String, String)>,
    pub top_queries: Vec<TopItemsQuery>,
}

/// In-memory stand-in for the Spotify Web API.
pub struct FakeSpotify {
    pub user: User,
    pub top_tracks: Vec<Track>,
    /// When set, `my_top_tracks` fails with this status.
    pub fail_top_tracks: Option<reqwest::StatusCode>,
    pub state: Mutex<FakeState>,
}

impl FakeSpotify {
    pub fn new(user: User, top_tracks: Vec<Track>) -> Self {
        Self {
            user,
            top_tracks,
            fail_top_tracks: None,
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn with_playlist(self, playlist: Playlist, track_ids: &[&str]) -> Self {
        self.state.lock().unwrap().playlists.push((
            playlist,
            track_ids.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(_, token)| token.clone())
            .collect()
    }

    pub fn playlist_count(&self) -> usize {
        self.state.lock().unwrap().playlists.len()
    }

    pub fn track_ids_of(&self, playlist_id: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|(p, _)| p.id == playlist_id)
            .map(|(_, ids)| ids.clone())
            .unwrap_or_default()
    }

    fn record(&self, name: &str, token: &str) {
        self.state
            .lock()
            .unwrap()
            .calls
            .push((name.to_string(), token.to_string()));
    }

    fn not_found() -> ApiError {
        ApiError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            message: "Not found.".to_string(),
        }
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    async fn my_top_tracks(
        &self,
        token: &str,
        query: TopItemsQuery,
    ) -> Result<Vec<Track>, ApiError> {
        self.record("my_top_tracks", token);
        self.state.lock().unwrap().top_queries.push(query);
        if let Some(status) = self.fail_top_tracks {
            return Err(ApiError::Status {
                status,
                message: "The access token expired".to_string(),
            });
        }
        Ok(self
            .top_tracks
            .iter()
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn me(&self, token: &str) -> Result<User, ApiError> {
        self.record("me", token);
        Ok(self.user.clone())
    }

    async fn my_playlists(&self, token: &str) -> Result<Vec<Playlist>, ApiError> {
        self.record("my_playlists", token);
        Ok(self
            .state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .map(|(p, _)| p.clone())
            .collect())
    }

    async fn create_playlist(
        &self,
        token: &str,
        _user_id: &str,
        name: &str,
    ) -> Result<Playlist, ApiError> {
        self.record("create_playlist", token);
        let mut state = self.state.lock().unwrap();
        let created = playlist(&format!("created{}", state.playlists.len()), name);
        state.playlists.push((created.clone(), Vec::new()));
        Ok(created)
    }

    async fn replace_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<String, ApiError> {
        self.record("replace_playlist_tracks", token);
        let mut state = self.state.lock().unwrap();
        let entry = state
            .playlists
            .iter_mut()
            .find(|(p, _)| p.id == playlist_id)
            .ok_or_else(Self::not_found)?;
        entry.1 = track_ids.to_vec();
        Ok("snap1".to_string())
    }

    async fn playlist(&self, token: &str, playlist_id: &str) -> Result<Playlist, ApiError> {
        self.record("playlist", token);
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|(p, _)| p.id == playlist_id)
            .map(|(p, _)| p.clone())
            .ok_or_else(Self::not_found)
    }

    async fn playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
    ) -> Result<Vec<Track>, ApiError> {
        self.record("playlist_tracks", token);
        Ok(self
            .track_ids_of(playlist_id)
            .iter()
            .map(|id| track(id))
            .collect())
    }
}

/// Session that never talks to Spotify.
pub struct StubSession {
    /// `Ok(access_token)` or `Err(message)` for every exchange.
    pub outcome: Result<String, String>,
    pub codes: Mutex<Vec<String>>,
}

impl StubSession {
    pub fn issuing(access_token: &str) -> Self {
        Self {
            outcome: Ok(access_token.to_string()),
            codes: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            codes: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OAuthSession for StubSession {
    async fn authorize_url(&self, options: &AuthorizeOptions) -> String {
        let mut url = url::Url::parse("https://accounts.example.com/authorize").unwrap();
        url.query_pairs_mut()
            .append_pair("client_id", "test-client")
            .append_pair("response_type", "code")
            .append_pair("scope", &options.scope.join(" "));
        url.to_string()
    }

    async fn request_access_token(&self, code: &str) -> Result<Token, AuthError> {
        self.codes.lock().unwrap().push(code.to_string());
        match &self.outcome {
            Ok(access_token) => Ok(Token {
                access_token: access_token.clone(),
                token_type: "Bearer".to_string(),
                scope: String::new(),
                expires_in: 3600,
                refresh_token: None,
                obtained_at: 0,
            }),
            Err(message) => Err(AuthError::Rejected {
                message: message.clone(),
            }),
        }
    }
}

/// Memory cache that remembers every write and read.
#[derive(Default)]
pub struct RecordingCache {
    inner: MemoryCache,
    pub sets: Mutex<Vec<(String, String, Duration)>>,
    pub gets: Mutex<Vec<String>>,
}

#[async_trait]
impl TokenCache for RecordingCache {
    async fn has(&self, key: &str) -> bool {
        self.inner.has(key).await
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        self.gets.lock().unwrap().push(key.to_string());
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.sets
            .lock()
            .unwrap()
            .push((key.to_string(), value.clone(), ttl));
        self.inner.set(key, value, ttl).await
    }
}

pub struct TestApp {
    pub api: Arc<FakeSpotify>,
    pub session: Arc<StubSession>,
    pub cache: Arc<RecordingCache>,
    pub state: AppState,
}

impl TestApp {
    pub fn new(api: FakeSpotify, session: StubSession) -> Self {
        let api = Arc::new(api);
        let session = Arc::new(session);
        let cache = Arc::new(RecordingCache::default());
        let state = AppState::new(api.clone(), session.clone(), cache.clone());
        Self {
            api,
            session,
            cache,
            state,
        }
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        router(self.state.clone())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get("location")
        .expect("response should carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
