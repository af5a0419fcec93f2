use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::{management::ACCESS_TOKEN_KEY, server::AppState};

/// Liveness probe; also reports whether an access token is cached.
pub async fn health(Extension(state): Extension<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "authenticated": state.cache.has(ACCESS_TOKEN_KEY).await,
    }))
}
