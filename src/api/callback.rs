use std::collections::HashMap;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    errors::RouteError,
    management::{ACCESS_TOKEN_KEY, ACCESS_TOKEN_TTL},
    server::AppState,
    success, warning,
};

use super::{UPDATE_PATH, found};

/// Completes the authorization code flow.
///
/// On success the access token is cached for [`ACCESS_TOKEN_TTL`] and the
/// user continues to `/update`. A rejected code answers 400 with the
/// accounts service's message as the body.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<AppState>,
) -> Result<Response, RouteError> {
    if let Some(error) = params.get("error") {
        warning!("Authorization was not granted: {}", error);
        return Ok(bad_request(format!("Authorization failed: {error}")));
    }

    let Some(code) = params.get("code") else {
        return Ok(bad_request("Missing authorization code.".to_string()));
    };

    let token = match state.session.request_access_token(code).await {
        Ok(token) => token,
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            return Ok(bad_request(e.to_string()));
        }
    };

    state
        .cache
        .set(ACCESS_TOKEN_KEY, token.access_token, ACCESS_TOKEN_TTL)
        .await?;
    success!("Access token cached.");

    Ok(found(UPDATE_PATH))
}

fn bad_request(body: String) -> Response {
    (StatusCode::BAD_REQUEST, body).into_response()
}
