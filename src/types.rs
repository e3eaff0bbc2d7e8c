use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeResponse {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodesResponse {
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodesQuery {
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UuidResponse {
    pub uuid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugResponse {
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyUriRequest {
    pub input: String,
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyUriResponse {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeTitleRequest {
    pub title: String,
    pub channel: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTitle {
    pub artist: Option<String>,
    pub track: String,
}

/// Client-credentials access token as returned by the Spotify accounts API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub obtained_at: u64,
}

impl AccessToken {
    /// True once `now` is within `buffer` seconds of the expiry.
    pub fn is_expired(&self, now: u64, buffer: u64) -> bool {
        now + buffer >= self.obtained_at + self.expires_in
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Headers the browser extension captured from a music.youtube.com session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderIngest {
    pub url: String,
    pub time: String,
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimpleResponse {
    pub ok: bool,
    pub message: Option<String>,
    pub sample: Option<Vec<HistorySample>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A played track as parsed from the history page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub artists: Vec<ArtistRef>,
    pub album: Option<String>,
    pub thumbnails: Vec<Thumbnail>,
    pub played: Option<String>,
}

/// History entry in the shape the web UI renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub video_id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub album: String,
    pub thumbnail: String,
    pub played: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    pub number: usize,
    pub title: String,
    pub artists: Vec<String>,
    pub played: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryPlaylist {
    pub playlist_id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongResult {
    pub video_id: Option<String>,
    pub title: String,
    pub artists: Vec<ArtistRef>,
    pub album: Option<String>,
    pub duration: Option<String>,
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Tabled)]
pub struct HeaderTableRow {
    pub header: String,
    pub captured: String,
}
