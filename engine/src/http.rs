// --- HTTP surface ----------------------------------------------------------
//
// Thin axum layer over `Player`:
//   - GET   /                          status page
//   - GET   /player/now_playing.json   artist/title/album/position/length
//   - GET   /player/version.json       {"version": "x.y.z"}
//   - GET   /player/progress.json      {"progress": 0..100}
//   - GET   /player/album_cover.jpg    cover art (placeholder when none)
//   - PATCH /player/<action>.json      one route per transport action
//   - PATCH /player/queue.json         {"paths": [...]}
//
// Mutating endpoints all answer with {"status": "ok"|"error", "msg": "..."}
// and HTTP 500 on failure.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde::Deserialize;
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::error;

use crate::error::PlayerError;
use crate::player::{Action, Artwork, Attribute, AttributeRequest, Player};

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const DEFAULT_TITLE: &str = "BeeFDeetS";
const PLACEHOLDER_SIZE: u32 = 300;

#[derive(Clone)]
pub struct AppState {
    pub player: Arc<Player>,
    /// Served from the cover endpoint when the track has no artwork.
    pub placeholder: Arc<Artwork>,
}

impl AppState {
    pub fn new(player: Player, placeholder: Artwork) -> Self {
        Self {
            player: Arc::new(player),
            placeholder: Arc::new(placeholder),
        }
    }
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "OK" }))
        .route("/player/now_playing.json", get(now_playing))
        .route("/player/version.json", get(version))
        .route("/player/progress.json", get(progress))
        .route("/player/album_cover.jpg", get(album_cover))
        .route("/player/queue.json", patch(enqueue));

    for action in Action::ALL {
        router = router.route(
            &format!("/player/{}.json", action.name()),
            patch(move |State(state): State<AppState>| perform(state, action)),
        );
    }

    router
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Grey square JPEG used when no cover is found.
pub fn placeholder_cover() -> image::ImageResult<Artwork> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
        PLACEHOLDER_SIZE,
        PLACEHOLDER_SIZE,
        Rgb([0x3a, 0x3a, 0x3a]),
    ));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Jpeg)?;
    Ok(Artwork::jpeg(buffer.into_inner()))
}

fn internal_error(context: &str, e: PlayerError) -> StatusCode {
    error!("{context}: {e}");
    StatusCode::INTERNAL_SERVER_ERROR
}

/// `{"status", "msg"}` envelope for mutating endpoints.
fn envelope(what: &str, result: Result<bool, PlayerError>) -> (StatusCode, Json<serde_json::Value>) {
    match result {
        Ok(true) => (StatusCode::OK, Json(json!({"status": "ok", "msg": ""}))),
        Ok(false) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"status": "error", "msg": format!("{what} failed")})),
        ),
        Err(e) => {
            error!("{what}: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "msg": e.to_string()})),
            )
        }
    }
}

async fn perform(state: AppState, action: Action) -> impl IntoResponse {
    envelope(action.name(), state.player.perform(action).await)
}

#[derive(Deserialize)]
struct QueueReq {
    paths: Vec<String>,
}

async fn enqueue(State(state): State<AppState>, Json(req): Json<QueueReq>) -> impl IntoResponse {
    envelope("queue", state.player.enqueue(req.paths).await)
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let request = AttributeRequest::new([Attribute::Artist, Attribute::Title, Attribute::Album]);
    let values = state
        .player
        .now_playing_values(&request)
        .await
        .map_err(|e| internal_error("index", e))?;

    let title = match values.as_slice() {
        [Some(artist), Some(title), Some(album)] => format!("{album} - \"{title}\" by {artist}"),
        _ => DEFAULT_TITLE.to_string(),
    };
    let progress = state
        .player
        .progress()
        .await
        .map_err(|e| internal_error("index", e))?;

    Ok(Html(render_index(&title, progress)))
}

fn render_index(title: &str, progress: f64) -> String {
    INDEX_TEMPLATE
        .replace("{{ title }}", &escape_html(title))
        .replace("{{ progress }}", &format!("{progress:.2}"))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

async fn now_playing(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let request = AttributeRequest::new([
        Attribute::Artist,
        Attribute::Title,
        Attribute::Album,
        Attribute::PlaybackPos,
        Attribute::Length,
    ]);
    let snapshot = state
        .player
        .now_playing(&request)
        .await
        .map_err(|e| internal_error("now_playing", e))?;
    Ok(Json(snapshot))
}

async fn version(State(state): State<AppState>) -> Result<Json<serde_json::Value>, StatusCode> {
    let version = state
        .player
        .version()
        .await
        .map_err(|e| internal_error("version", e))?;
    Ok(Json(json!({ "version": version })))
}

async fn progress(State(state): State<AppState>) -> Result<Json<serde_json::Value>, StatusCode> {
    let progress = state
        .player
        .progress()
        .await
        .map_err(|e| internal_error("progress", e))?;
    Ok(Json(json!({ "progress": progress })))
}

async fn album_cover(State(state): State<AppState>) -> Result<Response, StatusCode> {
    let cover = state
        .player
        .album_cover()
        .await
        .map_err(|e| internal_error("album_cover", e))?;
    let (data, mime_type) = match cover {
        Some(art) => (art.data, art.mime_type),
        None => (state.placeholder.data.clone(), state.placeholder.mime_type.clone()),
    };

    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(&mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static("image/jpeg"));
    headers.insert(header::CONTENT_TYPE, content_type);
    // The page reloads the cover whenever the title changes; browsers must
    // not hand back the previous track's art.
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));

    Ok((headers, data).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::command::fake::FakeRunner;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    fn app(code: i32, stdout: &str) -> (Router, Arc<FakeRunner>) {
        let fake = Arc::new(FakeRunner::new(code, stdout));
        let player = Player::with_runner("/opt/deadbeef/bin/deadbeef", fake.clone());
        let state = AppState::new(player, Artwork::jpeg(b"placeholder".to_vec()));
        (build_router(state, Path::new("static")), fake)
    }

    async fn send(router: Router, method: Method, uri: &str, body: Body) -> (StatusCode, HeaderMap, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, bytes.to_vec())
    }

    fn json_body(bytes: &[u8]) -> serde_json::Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn action_success_envelope() {
        let (router, fake) = app(0, "");
        let (status, _, body) = send(router, Method::PATCH, "/player/play_pause.json", Body::empty()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body), json!({"status": "ok", "msg": ""}));
        assert_eq!(fake.calls(), vec![vec!["--play-pause".to_string()]]);
    }

    #[tokio::test]
    async fn action_failure_is_500() {
        let (router, _) = app(1, "");
        let (status, _, body) = send(router, Method::PATCH, "/player/next.json", Body::empty()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(&body)["status"], "error");
    }

    #[tokio::test]
    async fn every_action_has_a_route() {
        for action in Action::ALL {
            let (router, fake) = app(0, "");
            let uri = format!("/player/{}.json", action.name());
            let (status, _, _) = send(router, Method::PATCH, &uri, Body::empty()).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(fake.calls(), vec![vec![action.flag().to_string()]]);
        }
    }

    #[tokio::test]
    async fn unknown_action_is_404() {
        let (router, fake) = app(0, "");
        let (status, _, _) = send(router, Method::PATCH, "/player/eject.json", Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn queue_forwards_paths() {
        let (router, fake) = app(0, "");
        let body = Body::from(r#"{"paths": ["/music/a.flac", "/music/b.flac"]}"#);
        let (status, _, _) = send(router, Method::PATCH, "/player/queue.json", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(fake.calls()[0], vec!["--queue", "/music/a.flac", "/music/b.flac"]);
    }

    #[tokio::test]
    async fn now_playing_json() {
        let (router, _) = app(0, "$Plaid::Eyen::Not for Threes::0:42::4:10\n");
        let (status, _, body) = send(router, Method::GET, "/player/now_playing.json", Body::empty()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({
                "artist": "Plaid",
                "title": "Eyen",
                "album": "Not for Threes",
                "playback_pos": "0:42",
                "length": "4:10",
            })
        );
    }

    #[tokio::test]
    async fn now_playing_json_is_empty_object_when_idle() {
        let (router, _) = app(0, "");
        let (_, _, body) = send(router, Method::GET, "/player/now_playing.json", Body::empty()).await;
        assert_eq!(json_body(&body), json!({}));
    }

    #[tokio::test]
    async fn version_json() {
        let (router, _) = app(0, "DeaDBeeF 1.9.6 Copyright\n");
        let (_, _, body) = send(router, Method::GET, "/player/version.json", Body::empty()).await;
        assert_eq!(json_body(&body), json!({"version": "1.9.6"}));
    }

    #[tokio::test]
    async fn cover_falls_back_to_placeholder_without_caching() {
        let (router, _) = app(0, "");
        let (status, headers, body) = send(router, Method::GET, "/player/album_cover.jpg", Body::empty()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"placeholder");
        assert_eq!(headers[header::CONTENT_TYPE], "image/jpeg");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache, no-store, must-revalidate");
        assert_eq!(headers[header::PRAGMA], "no-cache");
    }

    #[tokio::test]
    async fn index_renders_title() {
        let (router, _) = app(0, "$Boards <of> Canada::Dayvan Cowboy::The Campfire Headphase\n");
        let (status, _, body) = send(router, Method::GET, "/", Body::empty()).await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("The Campfire Headphase - &quot;Dayvan Cowboy&quot; by Boards &lt;of&gt; Canada"));
    }

    #[tokio::test]
    async fn index_defaults_when_idle() {
        let (router, _) = app(0, "");
        let (_, _, body) = send(router, Method::GET, "/", Body::empty()).await;
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("<title>BeeFDeetS</title>"));
        assert!(html.contains("width: 0.00%"));
    }

    #[test]
    fn placeholder_is_a_jpeg() {
        let art = placeholder_cover().unwrap();
        assert_eq!(art.mime_type, "image/jpeg");
        assert_eq!(&art.data[..2], &[0xFF, 0xD8]);
    }
}
