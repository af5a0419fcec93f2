use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};

use crate::{
    Res, api, info,
    management::{FlashBag, TokenCache},
    spotify::{OAuthSession, SpotifyApi},
};

/// Collaborators shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn SpotifyApi>,
    pub session: Arc<dyn OAuthSession>,
    pub cache: Arc<dyn TokenCache>,
    pub flashes: Arc<FlashBag>,
}

impl AppState {
    pub fn new(
        api: Arc<dyn SpotifyApi>,
        session: Arc<dyn OAuthSession>,
        cache: Arc<dyn TokenCache>,
    ) -> Self {
        Self {
            api,
            session,
            cache,
            flashes: Arc::new(FlashBag::new()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(api::INDEX_PATH, get(api::index))
        .route(api::UPDATE_PATH, get(api::update))
        .route(api::CALLBACK_PATH, get(api::callback))
        .route(api::REDIRECT_PATH, get(api::redirect))
        .route(api::HEALTH_PATH, get(api::health))
        .layer(Extension(state))
}

/// Binds `addr` and serves the router until the process is stopped.
///
/// # Errors
///
/// Fails when the address is malformed, cannot be bound, or the server
/// stops with an IO error.
pub async fn start_api_server(state: AppState, addr: &str) -> Res<()> {
    let addr = SocketAddr::from_str(addr)?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
