use std::{fmt, sync::LazyLock};

use regex::Regex;
use uuid::Uuid;

use crate::types::ParsedTitle;

pub const SPOTIFY_KINDS: [&str; 7] = [
    "track", "album", "artist", "playlist", "show", "episode", "user",
];

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

static SPOTIFY_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://open\.spotify\.com/(?:intl-[A-Za-z-]+/)?(?:embed/)?([a-z]+)/([^/?#]+)/?(?:[?#].*)?$",
    )
    .unwrap()
});

static SPOTIFY_URI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^spotify:([a-z]+):([^:]+)$").unwrap());

static SPOTIFY_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap());

static TITLE_NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*[(\[][^)\]]*\b(?:official|video|audio|lyrics?|visuali[sz]er|hd|hq|4k|remaster(?:ed)?|mv|m/v)\b[^)\]]*[)\]]",
    )
    .unwrap()
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const TITLE_SEPARATORS: [&str; 3] = [" - ", " – ", " — "];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotifyUriError {
    Empty,
    Unrecognized(String),
    UnsupportedKind(String),
    InvalidId(String),
}

impl fmt::Display for SpotifyUriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotifyUriError::Empty => write!(f, "empty Spotify reference"),
            SpotifyUriError::Unrecognized(input) => {
                write!(f, "not a Spotify link or URI: {}", input)
            }
            SpotifyUriError::UnsupportedKind(kind) => {
                write!(f, "unsupported Spotify kind: {}", kind)
            }
            SpotifyUriError::InvalidId(id) => write!(f, "invalid Spotify id: {}", id),
        }
    }
}

impl std::error::Error for SpotifyUriError {}

pub fn make_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Turns free text into a URL-safe slug; text without any usable character
/// becomes `n-a`.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let slug = SLUG_RE.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        "n-a".to_string()
    } else {
        slug.to_string()
    }
}

/// Normalizes a Spotify reference into a `spotify:<kind>:<id>` URI.
///
/// `input` may be a bare id (interpreted as `default_kind`), a Spotify URI or
/// an `open.spotify.com` link.
pub fn to_spotify_uri(input: &str, default_kind: &str) -> Result<String, SpotifyUriError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SpotifyUriError::Empty);
    }

    let (kind, id) = if let Some(caps) = SPOTIFY_URL_RE.captures(input) {
        (caps[1].to_string(), caps[2].to_string())
    } else if let Some(caps) = SPOTIFY_URI_RE.captures(input) {
        (caps[1].to_string(), caps[2].to_string())
    } else if input.contains(':') || input.contains('/') {
        return Err(SpotifyUriError::Unrecognized(input.to_string()));
    } else {
        (default_kind.to_string(), input.to_string())
    };

    if !SPOTIFY_KINDS.contains(&kind.as_str()) {
        return Err(SpotifyUriError::UnsupportedKind(kind));
    }
    if !SPOTIFY_ID_RE.is_match(&id) {
        return Err(SpotifyUriError::InvalidId(id));
    }

    Ok(format!("spotify:{}:{}", kind, id))
}

/// Splits a YouTube video title into artist and track.
///
/// Bracketed tags such as `(Official Video)` or `[HD]` are dropped. When the
/// title has no `Artist - Track` separator, the uploading channel (if given)
/// stands in for the artist.
pub fn parse_youtube_title(title: &str, channel: Option<&str>) -> ParsedTitle {
    let cleaned = TITLE_NOISE_RE.replace_all(title, "");
    let cleaned = collapse_whitespace(&cleaned);

    let split = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| cleaned.find(sep).map(|idx| (idx, sep.len())))
        .min_by_key(|(idx, _)| *idx);

    let (artist, track) = match split {
        Some((idx, len)) => (
            Some(cleaned[..idx].trim().to_string()),
            cleaned[idx + len..].trim().to_string(),
        ),
        None => (
            channel.map(artist_from_channel).filter(|c| !c.is_empty()),
            cleaned.clone(),
        ),
    };

    let track = track
        .split(" | ")
        .next()
        .unwrap_or_default()
        .trim_matches(|c: char| c == '"' || c.is_whitespace())
        .to_string();

    ParsedTitle {
        artist: artist.filter(|a| !a.is_empty()),
        track,
    }
}

/// Strips the ` - Topic` suffix YouTube appends to auto-generated artist
/// channels.
pub fn artist_from_channel(channel: &str) -> String {
    let channel = collapse_whitespace(channel);
    channel
        .strip_suffix(" - Topic")
        .unwrap_or(&channel)
        .trim()
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}
