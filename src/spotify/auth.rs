use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{config::Settings, types::AccessToken};

/// Seconds before expiry at which a cached token is considered stale.
pub const VALIDITY_BUFFER_SECS: u64 = 60;

#[derive(Debug)]
pub enum SpotifyError {
    MissingCredentials,
    Http(reqwest::Error),
    Rejected { status: u16, body: String },
}

impl fmt::Display for SpotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotifyError::MissingCredentials => {
                write!(f, "Spotify client id and secret are not configured")
            }
            SpotifyError::Http(e) => write!(f, "Spotify token request failed: {}", e),
            SpotifyError::Rejected { status, body } => {
                write!(f, "Spotify token request rejected ({}): {}", status, body)
            }
        }
    }
}

impl std::error::Error for SpotifyError {}

impl From<reqwest::Error> for SpotifyError {
    fn from(err: reqwest::Error) -> Self {
        SpotifyError::Http(err)
    }
}

/// Fetches and caches app-level Spotify access tokens using the
/// client-credentials grant.
///
/// Tokens are refreshed lazily: [`ClientCredentials::access_token`] only
/// talks to the accounts service when the cached token is missing or about
/// to expire. The cache lock is held across the refresh so concurrent callers
/// wait for a single request instead of racing.
pub struct ClientCredentials {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    buffer_secs: u64,
    cached: Mutex<Option<AccessToken>>,
}

impl ClientCredentials {
    pub fn new(
        client: Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            buffer_secs: VALIDITY_BUFFER_SECS,
            cached: Mutex::new(None),
        }
    }

    /// Builds a fetcher from settings; fails when credentials are missing.
    pub fn from_settings(client: Client, settings: &Settings) -> Result<Self, SpotifyError> {
        match (&settings.spotify_client_id, &settings.spotify_client_secret) {
            (Some(id), Some(secret)) => Ok(Self::new(
                client,
                settings.spotify_token_url.clone(),
                id.clone(),
                secret.clone(),
            )),
            _ => Err(SpotifyError::MissingCredentials),
        }
    }

    pub fn with_buffer(mut self, buffer_secs: u64) -> Self {
        self.buffer_secs = buffer_secs;
        self
    }

    /// Returns a token that stays valid for at least the validity buffer.
    pub async fn access_token(&self) -> Result<AccessToken, SpotifyError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now().timestamp() as u64;

        if let Some(token) = cached.as_ref() {
            if !token.is_expired(now, self.buffer_secs) {
                return Ok(token.clone());
            }
        }

        let token = self.request_token().await?;
        tracing::debug!(expires_in = token.expires_in, "refreshed Spotify app token");
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Drops the cached token so the next call fetches a new one.
    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }

    async fn request_token(&self) -> Result<AccessToken, SpotifyError> {
        let credentials = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));

        let res = self
            .client
            .post(&self.token_url)
            .header("Authorization", format!("Basic {}", credentials))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(SpotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let mut token: AccessToken = res.json().await?;
        token.obtained_at = Utc::now().timestamp() as u64;
        Ok(token)
    }
}
