use std::sync::Arc;

use crate::{
    config, error, info,
    management::{FileCache, MemoryCache, TokenCache},
    server::{AppState, start_api_server},
    spotify::{SessionConfig, SpotifySession, WebApi},
    warning,
};

use super::CacheBackend;

pub async fn serve(addr: Option<String>, backend: CacheBackend, open: bool) {
    let session_config = match SessionConfig::from_env() {
        Ok(c) => c,
        Err(e) => error!("Cannot configure Spotify session. Err: {}", e),
    };

    let session = match SpotifySession::new(session_config) {
        Ok(s) => s,
        Err(e) => error!("Cannot configure Spotify session. Err: {}", e),
    };
    if session.uses_pkce() {
        info!("No client secret configured, authorizing with PKCE.");
    }

    let cache: Arc<dyn TokenCache> = match backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::File => Arc::new(FileCache::in_data_dir()),
    };

    let state = AppState::new(Arc::new(WebApi::from_env()), Arc::new(session), cache);
    let addr = addr.unwrap_or_else(config::server_addr);

    let server_addr = addr.clone();
    let server = tokio::spawn(async move { start_api_server(state, &server_addr).await });

    if open {
        let url = format!("http://{addr}/");
        if webbrowser::open(&url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                url
            )
        }
    }

    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Server stopped. Err: {}", e),
        Err(e) => error!("Server task failed. Err: {}", e),
    }
}
