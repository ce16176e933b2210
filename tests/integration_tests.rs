//! Integration tests for the session facade, run against a wiremock server standing in for the Spotify API.

use serde_json::json;
use spotify_facade::model::PlaylistOwner;
use spotify_facade::{ClientIdentity, Error, ExchangeOutcome, Scope, SessionClient, SimplePlaylist, SpotifySession};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_session() -> SpotifySession {
    let _ = env_logger::builder().is_test(true).try_init();

    let identity = ClientIdentity::new("client-id", "client-secret", "http://localhost:9000/callback");
    SpotifySession::builder(identity)
        .scopes([Scope::UserReadPrivate, Scope::UserLibraryRead])
        .state("test-state")
        .build()
        .unwrap()
}

fn test_client(server: &MockServer) -> SessionClient {
    SessionClient::builder(test_session())
        .api_base_url(server.uri())
        .token_endpoint(format!("{}/api/token", server.uri()))
        .build()
}

fn token_response_json(access_token: &str, refresh_token: &str) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3600,
        "refresh_token": refresh_token,
        "scope": "user-read-private user-library-read"
    })
}

fn user_json(id: &str, display_name: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "display_name": display_name,
        "uri": format!("spotify:user:{}", id)
    })
}

fn playlist_page_json() -> serde_json::Value {
    json!({
        "items": [
            { "id": "pl1", "name": "Jazz", "owner": { "id": "alice" } },
            { "id": "pl2", "name": "Focus", "owner": { "id": "alice" } }
        ],
        "next": null,
        "limit": 20,
        "offset": 0,
        "total": 2
    })
}

fn audio_features_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "acousticness": 0.011,
        "danceability": 0.696,
        "energy": 0.905,
        "instrumentalness": 0.000905,
        "key": 2,
        "liveness": 0.302,
        "loudness": -2.743,
        "mode": 1,
        "speechiness": 0.103,
        "tempo": 114.944,
        "time_signature": 4,
        "valence": 0.625,
        "duration_ms": 207960
    })
}

#[tokio::test]
async fn exchange_code_stores_tokens() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response_json("T1", "R1")))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert_eq!(client.session().access_token(), None);

    let outcome = client.exchange_code("abc123").wait().await;

    assert_eq!(outcome, ExchangeOutcome::Complete);
    assert_eq!(client.session().access_token().as_deref(), Some("T1"));
    assert_eq!(client.session().refresh_token().as_deref(), Some("R1"));
}

#[tokio::test]
async fn second_exchange_overwrites_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("code=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response_json("T1", "R1")))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("code=xyz789"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response_json("T2", "R2")))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    assert_eq!(client.exchange_code("abc123").wait().await, ExchangeOutcome::Complete);
    assert_eq!(client.session().access_token().as_deref(), Some("T1"));

    assert_eq!(client.exchange_code("xyz789").wait().await, ExchangeOutcome::Complete);
    assert_eq!(client.session().access_token().as_deref(), Some("T2"));
    assert_eq!(client.session().refresh_token().as_deref(), Some("R2"));
}

#[tokio::test]
async fn failed_exchange_leaves_previous_credentials_unchanged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid authorization code"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client.session().set_credentials("T1", "R1");

    let outcome = client.exchange_code("expired").wait().await;

    assert_eq!(outcome, ExchangeOutcome::Failed);
    assert_eq!(client.session().access_token().as_deref(), Some("T1"));
    assert_eq!(client.session().refresh_token().as_deref(), Some("R1"));
}

#[tokio::test]
async fn current_user_uses_stored_access_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("alice", Some("Alice Example"))))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client.session().set_credentials("T1", "R1");

    let user = client.current_user().await.unwrap();

    assert_eq!(user.id, "alice");
    assert_eq!(user.name(), "Alice Example");
    assert_eq!(user.uri, "spotify:user:alice");
}

#[tokio::test]
async fn current_user_name_falls_back_to_uri_tail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("alice", None)))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    let user = client.current_user().await.unwrap();

    assert_eq!(user.display_name, None);
    assert_eq!(user.name(), "alice");
}

#[tokio::test]
async fn current_user_swallows_upstream_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    assert_eq!(client.current_user().await, None);
}

#[tokio::test]
async fn current_user_id_propagates_upstream_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "status": 401, "message": "No token provided" }
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    let err = client.current_user_id().await.unwrap_err();
    assert!(matches!(err, Error::UnhandledSpotifyError(401, message) if message == "No token provided"));
}

#[tokio::test]
async fn saved_playlists_returns_page_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("alice", None)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/alice/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(playlist_page_json()))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    let playlists = client.saved_playlists().await.unwrap();

    assert_eq!(playlists.len(), 2);
    assert_eq!(playlists[0].id, "pl1");
    assert_eq!(playlists[0].name, "Jazz");
    assert_eq!(playlists[0].owner.id, "alice");
}

#[tokio::test]
async fn saved_playlists_fails_when_identity_cannot_be_resolved() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    // the identity failure must propagate, not degrade to an empty list
    assert!(client.saved_playlists().await.is_err());
}

#[tokio::test]
async fn playlist_tracks_returns_page_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/alice/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "track": { "id": "t1", "name": "So What", "uri": "spotify:track:t1" } },
                { "track": null }
            ],
            "next": null,
            "limit": 100,
            "offset": 0,
            "total": 2
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    let playlist = SimplePlaylist {
        id: "pl1".to_owned(),
        name: "Jazz".to_owned(),
        owner: PlaylistOwner { id: "alice".to_owned() },
    };

    let tracks = client.playlist_tracks(&playlist).await.unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].track_id(), Some("t1"));
    assert_eq!(tracks[1].track_id(), None);
}

#[tokio::test]
async fn audio_features_present_for_analyzed_track() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/audio-features/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(audio_features_json("t1")))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    let result = client.audio_features("t1").await;

    assert!(result.is_present());
    let features = result.into_option().unwrap();
    assert_eq!(features.id, "t1");
    assert_eq!(features.key, 2);
    assert!((features.danceability - 0.696).abs() < f32::EPSILON);
}

#[tokio::test]
async fn audio_features_absent_on_rate_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/audio-features/t1"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "4"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    assert!(client.audio_features("t1").await.is_absent());
}

#[tokio::test]
async fn audio_features_bulk_loop_survives_throttling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/audio-features/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(audio_features_json("t1")))
        .mount(&mock_server)
        .await;

    // everything else gets throttled, some responses even without the Retry-After header
    Mock::given(method("GET"))
        .and(path("/audio-features/t2"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "4"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    let mut present = 0;
    for track_id in ["t1", "t2", "t3", "t4", "t5"] {
        if client.audio_features(track_id).await.is_present() {
            present += 1;
        }
    }

    assert_eq!(present, 1);
}
