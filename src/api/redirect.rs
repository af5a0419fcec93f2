use axum::{Extension, response::Response};

use crate::{
    server::AppState,
    spotify::SCOPES,
    types::AuthorizeOptions,
};

use super::found;

/// Sends the user to Spotify to grant the permissions in [`SCOPES`].
pub async fn redirect(Extension(state): Extension<AppState>) -> Response {
    let options = AuthorizeOptions {
        scope: SCOPES.iter().map(|s| s.to_string()).collect(),
        ..AuthorizeOptions::default()
    };

    found(&state.session.authorize_url(&options).await)
}
