use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};

use super::{ApiError, ClientToken};
use crate::{
    server::AppState,
    types::{
        HeaderIngest, HistoryEntry, HistoryQuery, LibraryPlaylist, SearchQuery, SimpleResponse,
        SongResult,
    },
    ytm::{self, AuthHeaders},
};

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const MAX_HISTORY_LIMIT: usize = 200;
pub const SEARCH_LIMIT: usize = 20;

const NOT_CONNECTED: &str =
    "Not connected yet. Open music.youtube.com with the extension enabled and play a track.";
const NO_HISTORY_YET: &str =
    "Connected, but no history returned yet. Try playing a track and retry.";
const NO_HEADERS: &str =
    "No headers found. Visit music.youtube.com with the extension loaded and play a track.";

async fn require_auth(state: &AppState) -> Result<AuthHeaders, ApiError> {
    state
        .headers
        .auth_headers()
        .await
        .ok_or_else(|| ApiError::NotFound(NO_HEADERS.to_string()))
}

/// `POST /ytm/ingest` stores headers captured by the browser extension.
pub async fn ingest(
    _: ClientToken,
    State(state): State<AppState>,
    payload: Result<Json<HeaderIngest>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let Json(payload) = payload?;

    if let Err(e) = state.headers.save(&payload).await {
        tracing::error!(path = %state.headers.path().display(), "saving headers failed: {}", e);
        return Err(ApiError::Internal("Failed to save headers".to_string()));
    }

    tracing::info!(source = %payload.url, "ingested YouTube Music headers");
    Ok(Json("OK"))
}

/// `GET /ytm/validate` always answers 200 so the UI can show a friendly state.
pub async fn validate(
    _: ClientToken,
    State(state): State<AppState>,
) -> Json<SimpleResponse> {
    let Some(auth) = state.headers.auth_headers().await else {
        return Json(SimpleResponse {
            ok: false,
            message: Some(NOT_CONNECTED.to_string()),
            sample: None,
        });
    };

    let history = state.music.history(&auth).await.unwrap_or_else(|e| {
        tracing::warn!("history lookup failed during validation: {}", e);
        Vec::new()
    });

    if history.is_empty() {
        return Json(SimpleResponse {
            ok: false,
            message: Some(NO_HISTORY_YET.to_string()),
            sample: None,
        });
    }

    Json(SimpleResponse {
        ok: true,
        message: Some("Connection validated".to_string()),
        sample: Some(ytm::history_sample(&history)),
    })
}

/// `GET /ytm/history?limit=N`
pub async fn history(
    _: ClientToken,
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(ApiError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_HISTORY_LIMIT
        )));
    }

    let auth = require_auth(&state).await?;
    let mut items = state.music.history(&auth).await.unwrap_or_else(|e| {
        tracing::warn!("history lookup failed: {}", e);
        Vec::new()
    });

    if items.is_empty() {
        return Err(ApiError::Internal(
            "Failed to get history from YouTube Music API".to_string(),
        ));
    }

    items.truncate(limit);
    Ok(Json(ytm::normalize_history(&items)))
}

/// `GET /ytm/library`
pub async fn library(
    _: ClientToken,
    State(state): State<AppState>,
) -> Result<Json<Vec<LibraryPlaylist>>, ApiError> {
    let auth = require_auth(&state).await?;

    state
        .music
        .library_playlists(&auth)
        .await
        .map(Json)
        .map_err(|e| ApiError::Internal(format!("Failed to get library playlists: {}", e)))
}

/// `GET /ytm/search?query=...`
pub async fn search(
    _: ClientToken,
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<SongResult>>, ApiError> {
    let Query(query) = query?;
    let Some(text) = query.query else {
        return Err(ApiError::Validation("query is required".to_string()));
    };

    let auth = require_auth(&state).await?;

    state
        .music
        .search_songs(&auth, &text, SEARCH_LIMIT)
        .await
        .map(Json)
        .map_err(|e| ApiError::Internal(format!("Search failed: {}", e)))
}

/// `DELETE /ytm/connect` forgets the captured headers.
pub async fn disconnect(
    _: ClientToken,
    State(state): State<AppState>,
) -> Result<Json<SimpleResponse>, ApiError> {
    let existed = state
        .headers
        .delete()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to delete files: {}", e)))?;

    let message = if existed {
        "Deleted headers"
    } else {
        "No headers to delete"
    };

    Ok(Json(SimpleResponse {
        ok: true,
        message: Some(message.to_string()),
        sample: None,
    }))
}
