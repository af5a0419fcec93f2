use askama::Template;
use axum::response::Html;

use crate::{
    management::Flash,
    types::{Playlist, Track},
};

/// Landing page; doubles as the confirmation page after a sync.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexView {
    pub flashes: Vec<Flash>,
    pub playlist: Option<PlaylistView>,
}

pub struct PlaylistView {
    pub name: String,
    /// Link to the playlist on open.spotify.com, empty when unknown.
    pub url: String,
    pub tracks: Vec<TrackView>,
}

pub struct TrackView {
    pub name: String,
    pub artists: String,
}

impl PlaylistView {
    pub fn new(playlist: &Playlist, tracks: &[Track]) -> Self {
        Self {
            name: playlist.name.clone(),
            url: playlist.external_urls.spotify.clone().unwrap_or_default(),
            tracks: tracks
                .iter()
                .map(|t| TrackView {
                    name: t.name.clone(),
                    artists: t.artist_names(),
                })
                .collect(),
        }
    }
}

impl IndexView {
    pub fn landing(flashes: Vec<Flash>) -> Self {
        Self {
            flashes,
            playlist: None,
        }
    }

    pub fn confirmation(flashes: Vec<Flash>, playlist: &Playlist, tracks: &[Track]) -> Self {
        Self {
            flashes,
            playlist: Some(PlaylistView::new(playlist, tracks)),
        }
    }

    /// # Errors
    ///
    /// Fails only if the template cannot be rendered.
    pub fn into_html(self) -> Result<Html<String>, askama::Error> {
        Ok(Html(self.render()?))
    }
}
