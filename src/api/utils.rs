use axum::{Json, extract::rejection::JsonRejection};

use super::ApiError;
use crate::{
    types::{
        ParsedTitle, SlugRequest, SlugResponse, SpotifyUriRequest, SpotifyUriResponse,
        UuidResponse, YoutubeTitleRequest,
    },
    utils,
};

pub async fn uuid() -> Json<UuidResponse> {
    Json(UuidResponse {
        uuid: utils::make_uuid(),
    })
}

pub async fn slug(
    payload: Result<Json<SlugRequest>, JsonRejection>,
) -> Result<Json<SlugResponse>, ApiError> {
    let Json(payload) = payload?;
    Ok(Json(SlugResponse {
        slug: utils::slugify(&payload.text),
    }))
}

pub async fn spotify_uri(
    payload: Result<Json<SpotifyUriRequest>, JsonRejection>,
) -> Result<Json<SpotifyUriResponse>, ApiError> {
    let Json(payload) = payload?;
    let kind = payload.kind.as_deref().unwrap_or("track");

    utils::to_spotify_uri(&payload.input, kind)
        .map(|uri| Json(SpotifyUriResponse { uri }))
        .map_err(|e| ApiError::Validation(e.to_string()))
}

pub async fn youtube_title(
    payload: Result<Json<YoutubeTitleRequest>, JsonRejection>,
) -> Result<Json<ParsedTitle>, ApiError> {
    let Json(payload) = payload?;
    Ok(Json(utils::parse_youtube_title(
        &payload.title,
        payload.channel.as_deref(),
    )))
}
