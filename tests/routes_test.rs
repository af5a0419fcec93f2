mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{FakeSpotify, StubSession, TestApp, body_string, location, playlist, track, user};
use topsync::{
    management::{ACCESS_TOKEN_KEY, TokenCache},
    spotify::SCOPES,
};

fn alice() -> FakeSpotify {
    FakeSpotify::new(user("alice", "Alice"), vec![track("D"), track("E")])
        .with_playlist(playlist("pl1", "Alice's Top Tracks"), &["A", "B", "C"])
}

#[tokio::test]
async fn test_index_renders_landing_page() {
    let app = TestApp::new(alice(), StubSession::issuing("tok123"));

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("href=\"/update\""));
    assert!(app.api.calls().is_empty());
}

#[tokio::test]
async fn test_update_without_token_redirects() {
    let app = TestApp::new(alice(), StubSession::issuing("tok123"));

    let response = app.get("/update").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/redirect");
    assert!(app.api.calls().is_empty());
}

#[tokio::test]
async fn test_redirect_requests_all_scopes() {
    let app = TestApp::new(alice(), StubSession::issuing("tok123"));

    let response = app.get("/redirect").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    let target = url::Url::parse(&location(&response)).unwrap();
    let scope = target
        .query_pairs()
        .find(|(k, _)| k == "scope")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    let requested: Vec<&str> = scope.split(' ').collect();
    assert_eq!(requested.len(), 7);
    for expected in SCOPES {
        assert!(requested.contains(&expected), "missing scope {expected}");
    }
}

#[tokio::test]
async fn test_callback_caches_token_and_redirects() {
    let app = TestApp::new(alice(), StubSession::issuing("tok123"));

    let response = app.get("/callback?code=XYZ").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/update");
    assert_eq!(app.session.codes.lock().unwrap().clone(), vec!["XYZ"]);

    let sets = app.cache.sets.lock().unwrap().clone();
    assert_eq!(
        sets,
        vec![(
            ACCESS_TOKEN_KEY.to_string(),
            "tok123".to_string(),
            Duration::from_secs(3600)
        )]
    );
    assert_eq!(app.cache.get(ACCESS_TOKEN_KEY).await.unwrap(), "tok123");
}

#[tokio::test]
async fn test_callback_with_rejected_code_returns_message() {
    let app = TestApp::new(alice(), StubSession::rejecting("Invalid authorization code"));

    let response = app.get("/callback?code=bad").await;

    assert!(response.status().is_client_error());
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "Invalid authorization code");
    assert!(app.cache.sets.lock().unwrap().is_empty());
    assert!(!app.cache.has(ACCESS_TOKEN_KEY).await);
}

#[tokio::test]
async fn test_callback_without_code_is_bad_request() {
    let app = TestApp::new(alice(), StubSession::issuing("tok123"));

    let response = app.get("/callback").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.session.codes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_callback_with_denied_access_is_bad_request() {
    let app = TestApp::new(alice(), StubSession::issuing("tok123"));

    let response = app.get("/callback?error=access_denied").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("access_denied"));
    assert!(app.session.codes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_full_flow_syncs_playlist() {
    let app = TestApp::new(alice(), StubSession::issuing("tok123"));

    let response = app.get("/update").await;
    assert_eq!(location(&response), "/redirect");

    let response = app.get("/redirect").await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = app.get("/callback?code=XYZ").await;
    assert_eq!(location(&response), "/update");

    let response = app.get("/update").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Playlist successfully updated!"));
    assert!(body.contains("Alice&#x27;s Top Tracks") || body.contains("Alice&#39;s Top Tracks"));
    assert!(body.contains("Song D"));
    assert!(body.contains("Song E"));
    assert!(!body.contains("Song A"));

    assert_eq!(app.api.track_ids_of("pl1"), vec!["D", "E"]);
    assert!(app.api.tokens().iter().all(|t| t == "tok123"));
}

#[tokio::test]
async fn test_success_notice_is_shown_once() {
    let app = TestApp::new(alice(), StubSession::issuing("tok123"));
    app.get("/callback?code=XYZ").await;

    let body = body_string(app.get("/update").await).await;
    assert!(body.contains("Playlist successfully updated!"));

    let body = body_string(app.get("/").await).await;
    assert!(!body.contains("Playlist successfully updated!"));
}

#[tokio::test]
async fn test_update_remote_failure_is_server_error() {
    let mut api = alice();
    api.fail_top_tracks = Some(reqwest::StatusCode::UNAUTHORIZED);
    let app = TestApp::new(api, StubSession::issuing("tok123"));
    app.get("/callback?code=XYZ").await;

    let response = app.get("/update").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.api.track_ids_of("pl1"), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_health_reports_authentication() {
    let app = TestApp::new(alice(), StubSession::issuing("tok123"));

    let body = body_string(app.get("/health").await).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["authenticated"], false);

    app.get("/callback?code=XYZ").await;

    let body = body_string(app.get("/health").await).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["authenticated"], true);
}

#[tokio::test]
async fn test_update_warns_when_there_are_no_top_tracks() {
    let api = FakeSpotify::new(user("alice", "Alice"), vec![])
        .with_playlist(playlist("pl1", "Alice's Top Tracks"), &["A"]);
    let app = TestApp::new(api, StubSession::issuing("tok123"));
    app.get("/callback?code=XYZ").await;

    let response = app.get("/update").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("flash-warning"));
    assert!(body.contains("Spotify reported no top tracks for the last four weeks."));
    assert!(body.contains("Playlist successfully updated!"));
    assert!(body.contains("The playlist is empty."));
}
