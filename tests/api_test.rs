//! Router tests: requests go through `build_router` with `oneshot`, the
//! YouTube Music backend is replaced by an in-memory double.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use mockito::Server;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::util::ServiceExt;
use vybe::{
    Res,
    codes::DEFAULT_ALPHABET,
    config::Settings,
    server::{AppState, build_router},
    spotify::ClientCredentials,
    types::{ArtistRef, HistoryItem, LibraryPlaylist, SongResult},
    ytm::{AuthHeaders, MusicLibrary},
};

const TOKEN: &str = "test-client-token";

#[derive(Default)]
struct FakeMusic {
    history: Vec<HistoryItem>,
    fail: bool,
}

#[async_trait]
impl MusicLibrary for FakeMusic {
    async fn history(&self, _auth: &AuthHeaders) -> Res<Vec<HistoryItem>> {
        if self.fail {
            return Err("upstream down".into());
        }
        Ok(self.history.clone())
    }

    async fn library_playlists(&self, _auth: &AuthHeaders) -> Res<Vec<LibraryPlaylist>> {
        Ok(vec![LibraryPlaylist {
            playlist_id: "PL1".to_string(),
            title: "Road Trip".to_string(),
            ..Default::default()
        }])
    }

    async fn search_songs(
        &self,
        _auth: &AuthHeaders,
        query: &str,
        limit: usize,
    ) -> Res<Vec<SongResult>> {
        Ok((0..30)
            .map(|i| SongResult {
                video_id: Some(format!("v{}", i)),
                title: format!("{} {}", query, i),
                ..Default::default()
            })
            .take(limit)
            .collect())
    }
}

fn played(n: usize) -> Vec<HistoryItem> {
    (0..n)
        .map(|i| HistoryItem {
            video_id: Some(format!("vid{}", i)),
            title: Some(format!("Song {}", i)),
            artists: vec![ArtistRef {
                name: "Artist".to_string(),
                id: None,
            }],
            played: Some("Today".to_string()),
            ..Default::default()
        })
        .collect()
}

struct TestApp {
    state: AppState,
    _dir: TempDir,
}

impl TestApp {
    fn new(music: FakeMusic) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            ytm_client_token: TOKEN.to_string(),
            headers_file: dir.path().join("headers.json"),
            max_generate: 10,
            ..Settings::default()
        };

        Self {
            state: AppState::from_settings(settings).with_music(Arc::new(music)),
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(request("GET", uri, None, None)).await
    }

    async fn ytm(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(request(method, uri, Some(TOKEN), body)).await
    }

    async fn connect(&self) {
        let payload = json!({
            "url": "https://music.youtube.com/youtubei/v1/browse",
            "time": "2026-10-16T10:00:00Z",
            "headers": { "cookie": "SAPISID=abc", "authorization": "SAPISIDHASH 1_x" }
        });
        let (status, body) = self.ytm("POST", "/ytm/ingest", Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("OK"));
    }
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("x-client-token", token);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new(FakeMusic::default());

    for path in ["/healthz", "/health"] {
        let (status, body) = app.get(path).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }
}

#[tokio::test]
async fn test_routing_errors() {
    let app = TestApp::new(FakeMusic::default());

    let (status, _) = app.get("/nonexistent").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(request("POST", "/healthz", None, None)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = app
        .send(request("POST", "/api/v1/codes/one", None, None))
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_get_one_code() {
    let app = TestApp::new(FakeMusic::default());

    let (status, body) = app.get("/api/v1/codes/one").await;
    assert_eq!(status, StatusCode::OK);

    let code = body["code"].as_str().unwrap();
    assert_eq!(code.chars().count(), 4);
    assert!(code.chars().all(|c| DEFAULT_ALPHABET.contains(c)));
}

#[tokio::test]
async fn test_get_many_codes_bounds() {
    let app = TestApp::new(FakeMusic::default());

    let (status, body) = app.get("/api/v1/codes/many?count=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["codes"].as_array().unwrap().len(), 3);

    let (status, body) = app.get("/api/v1/codes/many").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["codes"].as_array().unwrap().len(), 1);

    for uri in [
        "/api/v1/codes/many?count=0",
        "/api/v1/codes/many?count=11",
        "/api/v1/codes/many?count=lots",
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert!(body["detail"].is_string());
    }
}

#[tokio::test]
async fn test_utils_endpoints() {
    let app = TestApp::new(FakeMusic::default());

    let (status, body) = app.get("/api/v1/utils/uuid").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uuid"].as_str().unwrap().len(), 36);

    let (status, body) = app
        .send(request(
            "POST",
            "/api/v1/utils/slug",
            None,
            Some(json!({"text": "Hello World"})),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"slug": "hello-world"}));

    let (status, body) = app
        .send(request("POST", "/api/v1/utils/slug", None, Some(json!({}))))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_spotify_uri_and_title_endpoints() {
    let app = TestApp::new(FakeMusic::default());

    let (status, body) = app
        .send(request(
            "POST",
            "/api/v1/utils/spotify-uri",
            None,
            Some(json!({"input": "https://open.spotify.com/album/1DFixLWuPkv3KT3TnV35m3?si=x"})),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uri"], "spotify:album:1DFixLWuPkv3KT3TnV35m3");

    let (status, body) = app
        .send(request(
            "POST",
            "/api/v1/utils/spotify-uri",
            None,
            Some(json!({"input": "https://example.com/x"})),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["detail"],
        "not a Spotify link or URI: https://example.com/x"
    );

    let (status, body) = app
        .send(request(
            "POST",
            "/api/v1/utils/youtube-title",
            None,
            Some(json!({"title": "Daft Punk - Get Lucky (Official Audio)"})),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"artist": "Daft Punk", "track": "Get Lucky"}));
}

#[tokio::test]
async fn test_ytm_requires_client_token() {
    let app = TestApp::new(FakeMusic::default());

    for (method, uri) in [
        ("GET", "/ytm/validate"),
        ("GET", "/ytm/history"),
        ("GET", "/ytm/library"),
        ("GET", "/ytm/search?query=x"),
        ("DELETE", "/ytm/connect"),
    ] {
        let (status, body) = app.send(request(method, uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body, json!({"detail": "Invalid token"}));
    }

    let (status, _) = app
        .send(request("GET", "/ytm/validate", Some("wrong"), None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Token is checked before the body is parsed
    let (status, _) = app
        .send(request("POST", "/ytm/ingest", Some("wrong"), Some(json!({}))))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ytm_not_connected() {
    let app = TestApp::new(FakeMusic {
        history: played(3),
        fail: false,
    });

    let (status, body) = app.ytm("GET", "/ytm/validate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Not connected yet"));

    for uri in ["/ytm/history", "/ytm/library", "/ytm/search?query=x"] {
        let (status, body) = app.ytm("GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(body["detail"].as_str().unwrap().starts_with("No headers found"));
    }
}

#[tokio::test]
async fn test_ytm_capture_without_session_cookie_is_not_connected() {
    let app = TestApp::new(FakeMusic {
        history: played(3),
        fail: false,
    });

    let payload = json!({
        "url": "https://music.youtube.com/youtubei/v1/browse",
        "time": "2026-10-16T10:00:00Z",
        "headers": { "accept-language": "en-US", "x-goog-authuser": "0" }
    });
    let (status, _) = app.ytm("POST", "/ytm/ingest", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.ytm("GET", "/ytm/validate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Not connected yet"));

    let (status, _) = app.ytm("GET", "/ytm/history", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ytm_ingest_validate_and_disconnect() {
    let app = TestApp::new(FakeMusic {
        history: played(8),
        fail: false,
    });
    app.connect().await;

    let (status, body) = app.ytm("GET", "/ytm/validate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["message"], "Connection validated");
    let sample = body["sample"].as_array().unwrap();
    assert_eq!(sample.len(), 5);
    assert_eq!(sample[0]["number"], 1);
    assert_eq!(sample[0]["artists"], json!(["Artist"]));

    let (status, body) = app.ytm("DELETE", "/ytm/connect", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted headers");

    let (_, body) = app.ytm("DELETE", "/ytm/connect", None).await;
    assert_eq!(body["message"], "No headers to delete");

    // Cached auth is dropped together with the file
    let (_, body) = app.ytm("GET", "/ytm/validate", None).await;
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_ytm_validate_without_history() {
    let app = TestApp::new(FakeMusic {
        history: Vec::new(),
        fail: true,
    });
    app.connect().await;

    let (status, body) = app.ytm("GET", "/ytm/validate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Connected, but no history"));
}

#[tokio::test]
async fn test_ytm_history() {
    let app = TestApp::new(FakeMusic {
        history: played(60),
        fail: false,
    });
    app.connect().await;

    let (status, body) = app.ytm("GET", "/ytm/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 50);

    let (status, body) = app.ytm("GET", "/ytm/history?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[0],
        json!({
            "videoId": "vid0",
            "title": "Song 0",
            "artists": ["Artist"],
            "album": "",
            "thumbnail": "",
            "played": "Today"
        })
    );

    for uri in ["/ytm/history?limit=0", "/ytm/history?limit=201"] {
        let (status, _) = app.ytm("GET", uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
    }
}

#[tokio::test]
async fn test_ytm_history_failure_is_server_error() {
    let app = TestApp::new(FakeMusic {
        history: Vec::new(),
        fail: true,
    });
    app.connect().await;

    let (status, body) = app.ytm("GET", "/ytm/history", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Failed to get history from YouTube Music API"
    );
}

#[tokio::test]
async fn test_ytm_library_and_search() {
    let app = TestApp::new(FakeMusic::default());
    app.connect().await;

    let (status, body) = app.ytm("GET", "/ytm/library", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["playlistId"], "PL1");

    let (status, body) = app.ytm("GET", "/ytm/search?query=daft%20punk", None).await;
    assert_eq!(status, StatusCode::OK);
    let songs = body.as_array().unwrap();
    assert_eq!(songs.len(), 20);
    assert_eq!(songs[0]["title"], "daft punk 0");

    let (status, _) = app.ytm("GET", "/ytm/search", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_spotify_token_endpoint() {
    let app = TestApp::new(FakeMusic::default());
    let (status, _) = app.ytm("GET", "/api/v1/spotify/token", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"access_token": "app-token", "token_type": "Bearer", "expires_in": 3600})
                .to_string(),
        )
        .create_async()
        .await;

    let fetcher = ClientCredentials::new(
        reqwest::Client::new(),
        format!("{}/api/token", server.url()),
        "id",
        "secret",
    );
    let app = TestApp {
        state: app.state.clone().with_spotify(Some(Arc::new(fetcher))),
        _dir: app._dir,
    };

    let (status, _) = app
        .send(request("GET", "/api/v1/spotify/token", None, None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.ytm("GET", "/api/v1/spotify/token", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "app-token");
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["expires_in"].as_u64().unwrap() <= 3600);
}

#[tokio::test]
async fn test_cors_allows_extension_and_configured_origins() {
    let app = TestApp::new(FakeMusic::default());

    for origin in ["chrome-extension://abcdef", "http://localhost:5173"] {
        let response = build_router(app.state.clone())
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            origin
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }

    let response = build_router(app.state.clone())
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .header(header::ORIGIN, "https://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
