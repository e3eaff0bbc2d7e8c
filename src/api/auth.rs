use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use sha2::{Digest, Sha256};

use super::ApiError;
use crate::server::AppState;

pub const CLIENT_TOKEN_HEADER: &str = "x-client-token";

/// Extractor that admits a request only when its `x-client-token` header
/// matches the configured client token.
///
/// Put it before any body extractor so bad tokens are rejected before the
/// body is parsed.
pub struct ClientToken;

impl<S> FromRequestParts<S> for ClientToken
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let provided = parts
            .headers
            .get(CLIENT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());

        if tokens_match(provided, &state.settings.ytm_client_token) {
            Ok(ClientToken)
        } else {
            tracing::debug!("rejected request with invalid client token");
            Err(ApiError::Unauthorized)
        }
    }
}

// Compares digests so the comparison time does not depend on the common prefix.
fn tokens_match(provided: Option<&str>, expected: &str) -> bool {
    match provided {
        Some(token) => Sha256::digest(token.as_bytes()) == Sha256::digest(expected.as_bytes()),
        None => false,
    }
}
