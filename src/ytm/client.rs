use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::{Value, json};
use sha1::{Digest, Sha1};

use super::{headers::AuthHeaders, parse};
use crate::{
    Res,
    types::{HistoryItem, LibraryPlaylist, SongResult},
};

pub const HISTORY_BROWSE_ID: &str = "FEmusic_history";
pub const LIBRARY_PLAYLISTS_BROWSE_ID: &str = "FEmusic_liked_playlists";
/// Search params restricting results to songs.
pub const SONGS_FILTER_PARAMS: &str = "EgWKAQIIAWoMEA4QChADEAQQCRAF";
pub const DEFAULT_CLIENT_VERSION: &str = "1.20240101.01.00";
pub const YTM_ORIGIN: &str = "https://music.youtube.com";

/// Read access to a YouTube Music account.
#[async_trait]
pub trait MusicLibrary: Send + Sync {
    async fn history(&self, auth: &AuthHeaders) -> Res<Vec<HistoryItem>>;

    async fn library_playlists(&self, auth: &AuthHeaders) -> Res<Vec<LibraryPlaylist>>;

    async fn search_songs(
        &self,
        auth: &AuthHeaders,
        query: &str,
        limit: usize,
    ) -> Res<Vec<SongResult>>;
}

/// [`MusicLibrary`] backed by the InnerTube API that the YouTube Music web
/// client uses. Requests replay the captured session headers and are signed
/// with a fresh `SAPISIDHASH` derived from the session cookie.
pub struct InnertubeClient {
    client: Client,
    base_url: String,
}

impl InnertubeClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, auth: &AuthHeaders, endpoint: &str, mut body: Value) -> Res<Value> {
        body["context"] = context(auth);

        let origin = auth.get("x-origin").unwrap_or(YTM_ORIGIN);
        let sapisid = auth
            .sapisid()
            .ok_or("captured cookie has no SAPISID to sign the request with")?;

        let mut req = self
            .client
            .post(format!("{}/youtubei/v1/{}", self.base_url, endpoint))
            .query(&[("alt", "json")])
            .json(&body);
        for (name, value) in auth.iter().filter(|(name, _)| *name != "authorization") {
            req = req.header(name, value);
        }
        req = req
            .header("origin", origin)
            .header(
                "authorization",
                sapisid_hash(sapisid, origin, Utc::now().timestamp()),
            );

        let res = req.send().await?.error_for_status()?;
        let value: Value = res.json().await?;
        Ok(value)
    }

    async fn browse(&self, auth: &AuthHeaders, browse_id: &str) -> Res<Value> {
        self.post(auth, "browse", json!({ "browseId": browse_id }))
            .await
    }
}

#[async_trait]
impl MusicLibrary for InnertubeClient {
    async fn history(&self, auth: &AuthHeaders) -> Res<Vec<HistoryItem>> {
        let response = self.browse(auth, HISTORY_BROWSE_ID).await?;
        Ok(parse::parse_history(&response))
    }

    async fn library_playlists(&self, auth: &AuthHeaders) -> Res<Vec<LibraryPlaylist>> {
        let response = self.browse(auth, LIBRARY_PLAYLISTS_BROWSE_ID).await?;
        Ok(parse::parse_library_playlists(&response))
    }

    async fn search_songs(
        &self,
        auth: &AuthHeaders,
        query: &str,
        limit: usize,
    ) -> Res<Vec<SongResult>> {
        let body = json!({ "query": query, "params": SONGS_FILTER_PARAMS });
        let response = self.post(auth, "search", body).await?;
        Ok(parse::parse_search_songs(&response, limit))
    }
}

/// `SAPISIDHASH <ts>_<sha1("<ts> <sapisid> <origin>")>`, the signature the
/// YouTube Music web client sends with every request.
pub fn sapisid_hash(sapisid: &str, origin: &str, timestamp: i64) -> String {
    let digest = Sha1::digest(format!("{} {} {}", timestamp, sapisid, origin).as_bytes());
    format!("SAPISIDHASH {}_{:x}", timestamp, digest)
}

fn context(auth: &AuthHeaders) -> Value {
    let version = auth
        .get("x-youtube-client-version")
        .unwrap_or(DEFAULT_CLIENT_VERSION);
    let language = auth
        .get("accept-language")
        .and_then(|l| l.split([',', ';', '-']).next())
        .filter(|l| !l.is_empty())
        .unwrap_or("en");

    json!({
        "client": {
            "clientName": "WEB_REMIX",
            "clientVersion": version,
            "hl": language,
        },
        "user": {}
    })
}
