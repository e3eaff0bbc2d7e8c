use axum::{Json, extract::State};
use chrono::Utc;

use super::{ApiError, ClientToken};
use crate::{server::AppState, types::SpotifyTokenResponse};

/// `GET /api/v1/spotify/token` hands out the app-level access token.
pub async fn token(
    _: ClientToken,
    State(state): State<AppState>,
) -> Result<Json<SpotifyTokenResponse>, ApiError> {
    let Some(fetcher) = state.spotify.as_ref() else {
        return Err(ApiError::Unavailable(
            "Spotify credentials are not configured".to_string(),
        ));
    };

    let token = fetcher.access_token().await.map_err(|e| {
        tracing::warn!("Spotify token fetch failed: {}", e);
        ApiError::Upstream("Failed to obtain Spotify access token".to_string())
    })?;

    // Report the remaining lifetime, not the one granted at issue time.
    let age = (Utc::now().timestamp() as u64).saturating_sub(token.obtained_at);
    Ok(Json(SpotifyTokenResponse {
        expires_in: token.expires_in.saturating_sub(age),
        access_token: token.access_token,
        token_type: token.token_type,
    }))
}
